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

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::log::core::GamLogRecord;
use crate::log::formatters::{GamJsonFormatter, GamTextFormatter};

pub trait GamLogHandler {
    fn handle(&self, record: &GamLogRecord);

    fn flush(&self) {}
}

fn render(record: &GamLogRecord, json: bool) -> String {
    if json {
        GamJsonFormatter::format(record)
    } else {
        GamTextFormatter::format(record)
    }
}

/// Writes to stderr so stdout stays free for command output.
pub struct GamStderrHandler {
    json: bool,
}

impl GamStderrHandler {
    pub fn new(json: bool) -> Self {
        GamStderrHandler { json }
    }
}

impl GamLogHandler for GamStderrHandler {
    fn handle(&self, record: &GamLogRecord) {
        eprintln!("{}", render(record, self.json));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Appends one line per record to a file.
pub struct GamFileHandler {
    path: String,
    json: bool,
    lock: Mutex<()>,
}

impl GamFileHandler {
    pub fn new(path: String, json: bool) -> Self {
        GamFileHandler {
            path,
            json,
            lock: Mutex::new(()),
        }
    }
}

impl GamLogHandler for GamFileHandler {
    fn handle(&self, record: &GamLogRecord) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let line = render(record, self.json);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
