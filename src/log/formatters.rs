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

use chrono::{DateTime, SecondsFormat, Utc};

use crate::log::core::GamLogRecord;

pub struct GamJsonFormatter;

impl GamJsonFormatter {
    pub fn format(record: &GamLogRecord) -> String {
        record.to_json().to_string()
    }
}

pub struct GamTextFormatter;

impl GamTextFormatter {
    /// `2026-01-01T00:00:00.000Z INFO  gam::runner: message`
    pub fn format(record: &GamLogRecord) -> String {
        let ts: DateTime<Utc> = record.timestamp.into();
        format!(
            "{} {:<5} {}: {}",
            ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            record.level.as_str(),
            record.target,
            record.message
        )
    }
}
