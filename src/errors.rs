//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Gam.
//! The Gam project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Gam Error Module
//!
//! This module defines the error types and utilities used throughout Gam for
//! consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors (missing inputs, failed chunk writes)
//! - **Csv**: Malformed CSV input or output failures
//! - **Encoding**: Input bytes that decode under none of the supported encodings
//! - **Schema**: Input tables missing a required column
//! - **Validation**: Invalid configuration or parameters
//! - **Pattern**: Pattern table construction failures (duplicate or invalid rules)
//! - **Classification**: A classification collaborator call failed
//! - **Chunk**: A chunk could not be persisted
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures
//!
//! Record-level failures are not surfaced through this type during a batch
//! run; they are converted into sentinel rows by the operators. Only
//! chunk-level and run-level failures propagate to the caller.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Gam.
pub type Result<T> = std::result::Result<T, GamError>;

/// Canonical error enumeration for Gam.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum GamError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Errors raised while parsing or writing CSV.
    #[error("csv error: {0}")]
    Csv(String),

    /// Input bytes could not be decoded with any supported encoding.
    #[error("encoding error in '{path}': {message}")]
    Encoding { path: String, message: String },

    /// Errors caused by input tables with an incompatible layout.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Pattern table construction failures.
    #[error("pattern '{pattern}' rejected: {message}")]
    Pattern { pattern: String, message: String },

    /// A classification collaborator call failed.
    #[error("classification failed: {message}")]
    Classification { message: String },

    /// A chunk could not be persisted.
    #[error("chunk {index} failed: {message}")]
    Chunk { index: usize, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for GamError {
    fn from(err: io::Error) -> Self {
        GamError::Io(err.to_string())
    }
}

impl From<csv::Error> for GamError {
    fn from(err: csv::Error) -> Self {
        GamError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for GamError {
    fn from(err: serde_json::Error) -> Self {
        GamError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for GamError {
    fn from(err: serde_yaml::Error) -> Self {
        GamError::Serde(err.to_string())
    }
}

impl GamError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        GamError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        GamError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct pattern table errors.
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        GamError::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Helper to construct encoding errors.
    pub fn encoding(path: impl Into<String>, message: impl Into<String>) -> Self {
        GamError::Encoding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct classification errors.
    pub fn classification<T: Into<String>>(message: T) -> Self {
        GamError::Classification {
            message: message.into(),
        }
    }

    /// Helper to construct chunk persistence errors.
    pub fn chunk(index: usize, message: impl Into<String>) -> Self {
        GamError::Chunk {
            index,
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        GamError::Internal(message.into())
    }
}
