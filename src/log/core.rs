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

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Map, Value};

use crate::log::config::GamLogConfig;
use crate::log::handlers::{GamFileHandler, GamLogHandler, GamStderrHandler};

#[derive(Clone, Debug)]
pub struct GamLogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: SystemTime,
}

impl GamLogRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        GamLogRecord {
            level,
            target: target.into(),
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn to_json(&self) -> Value {
        let ts = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("target".into(), json!(self.target));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp_ms".into(), json!(ts));
        Value::Object(data)
    }
}

pub struct GamLogger {
    level: LevelFilter,
    handlers: Vec<Box<dyn GamLogHandler + Send + Sync>>,
}

static LOGGER: OnceLock<GamLogger> = OnceLock::new();

impl GamLogger {
    pub fn new(config: &GamLogConfig) -> Self {
        let mut handlers: Vec<Box<dyn GamLogHandler + Send + Sync>> = Vec::new();
        if config.console_enabled {
            handlers.push(Box::new(GamStderrHandler::new(config.json_format)));
        }
        if config.file_enabled {
            if let Some(path) = &config.file_path {
                handlers.push(Box::new(GamFileHandler::new(path.clone(), config.json_format)));
            }
        }
        GamLogger {
            level: config.level_filter(),
            handlers,
        }
    }

    /// Installs the process-wide logger. Safe to call multiple times; the
    /// first call wins.
    pub fn init(config: GamLogConfig) {
        let logger = LOGGER.get_or_init(|| GamLogger::new(&config));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(logger.level);
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for GamLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = GamLogRecord::new(
            record.level(),
            record.target(),
            record.args().to_string(),
        );
        for handler in &self.handlers {
            handler.handle(&entry);
        }
    }

    fn flush(&self) {
        for handler in &self.handlers {
            handler.flush();
        }
    }
}
