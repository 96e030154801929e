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

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for [`crate::log::GamLogger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamLogConfig {
    /// Minimum level: TRACE, DEBUG, INFO, WARN/WARNING, ERROR or OFF.
    pub level: String,
    pub console_enabled: bool,
    /// Render records as JSON objects instead of text lines.
    pub json_format: bool,
    pub file_enabled: bool,
    pub file_path: Option<String>,
}

impl Default for GamLogConfig {
    fn default() -> Self {
        GamLogConfig {
            level: "INFO".to_string(),
            console_enabled: true,
            json_format: false,
            file_enabled: false,
            file_path: None,
        }
    }
}

impl GamLogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "TRACE" => LevelFilter::Trace,
            "DEBUG" => LevelFilter::Debug,
            "WARN" | "WARNING" => LevelFilter::Warn,
            "ERROR" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GamLogConfigBuilder {
    pub level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_path: Option<String>,
}

impl GamLogConfigBuilder {
    pub fn build(self) -> GamLogConfig {
        let base = GamLogConfig::default();
        // A path alone is enough to turn the file handler on.
        let file_enabled = self.file_enabled.unwrap_or(self.file_path.is_some());
        GamLogConfig {
            level: self.level.unwrap_or(base.level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format: self.json_format.unwrap_or(base.json_format),
            file_enabled,
            file_path: self.file_path.or(base.file_path),
        }
    }

    /// Reads a config object; unknown or malformed input yields the defaults.
    pub fn from_json(value: &Value) -> GamLogConfig {
        let builder: GamLogConfigBuilder =
            serde_json::from_value(value.clone()).unwrap_or_default();
        builder.build()
    }
}
