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

//! # Gam Log Module
//!
//! Structured logging behind the `log` facade. Library code only uses the
//! `log::info!`/`log::warn!` macros; the binary installs [`GamLogger`], which
//! renders each record as a JSON object or a text line and fans it out to
//! stderr and an optional append-only file.

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::{GamLogConfig, GamLogConfigBuilder};
pub use self::core::{GamLogRecord, GamLogger};
pub use self::formatters::{GamJsonFormatter, GamTextFormatter};
pub use self::handlers::{GamFileHandler, GamLogHandler, GamStderrHandler};
