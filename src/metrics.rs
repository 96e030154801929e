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

//! # Gam Metrics Module
//!
//! Per-chunk counters and the run report written next to the chunk outputs
//! as `run_report.json`.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::io::GamIO;
use crate::record::GamRecordOutcome;

/// File name of the report inside the output directory.
pub const REPORT_FILE_NAME: &str = "run_report.json";

/// Failure messages kept in a report.
pub const MAX_REPORTED_FAILURES: usize = 20;

/// Counters for one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamChunkStats {
    /// 1-based chunk index.
    pub index: usize,
    pub input_records: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub discarded: usize,
    pub failed: usize,
    /// The chunk already had an output file and was not reprocessed.
    pub skipped: bool,
}

impl GamChunkStats {
    /// Stats for a chunk found complete on disk.
    pub fn skipped(index: usize, input_records: usize) -> Self {
        GamChunkStats {
            index,
            input_records,
            skipped: true,
            ..Default::default()
        }
    }

    pub fn from_outcomes(index: usize, outcomes: &[GamRecordOutcome]) -> Self {
        let mut stats = GamChunkStats {
            index,
            input_records: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                GamRecordOutcome::Accepted { .. } => stats.accepted += 1,
                GamRecordOutcome::Rejected => stats.rejected += 1,
                GamRecordOutcome::Discarded => stats.discarded += 1,
                GamRecordOutcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }

    /// Rows persisted for this chunk.
    pub fn rows_written(&self) -> usize {
        self.accepted + self.failed
    }
}

/// Totals across all chunks of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamRunTotals {
    pub input_records: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub discarded: usize,
    pub failed: usize,
    pub processed_chunks: usize,
    pub skipped_chunks: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamRunReport {
    pub operator: String,
    pub total_records: usize,
    pub total_chunks: usize,
    pub chunks: Vec<GamChunkStats>,
    pub totals: GamRunTotals,
    /// Label -> number of persisted rows tagged with it.
    pub emotion_counts: BTreeMap<String, usize>,
    /// First [`MAX_REPORTED_FAILURES`] record failure messages.
    pub failures: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub final_path: Option<String>,
    pub cancelled: bool,
}

impl GamRunReport {
    pub fn new(operator: impl Into<String>, total_records: usize, total_chunks: usize) -> Self {
        GamRunReport {
            operator: operator.into(),
            total_records,
            total_chunks,
            chunks: Vec::new(),
            totals: GamRunTotals::default(),
            emotion_counts: BTreeMap::new(),
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            final_path: None,
            cancelled: false,
        }
    }

    /// Folds one chunk's stats, and the outcomes it was computed from, into
    /// the report. Skipped chunks pass no outcomes.
    pub fn record_chunk(&mut self, stats: GamChunkStats, outcomes: &[GamRecordOutcome]) {
        let totals = &mut self.totals;
        totals.input_records += stats.input_records;
        totals.accepted += stats.accepted;
        totals.rejected += stats.rejected;
        totals.discarded += stats.discarded;
        totals.failed += stats.failed;
        if stats.skipped {
            totals.skipped_chunks += 1;
        } else {
            totals.processed_chunks += 1;
        }

        for outcome in outcomes {
            match outcome {
                GamRecordOutcome::Accepted { labels, .. } => {
                    for label in labels {
                        *self.emotion_counts.entry(label.clone()).or_insert(0) += 1;
                    }
                }
                GamRecordOutcome::Failed { message, .. } => {
                    if self.failures.len() < MAX_REPORTED_FAILURES {
                        self.failures.push(format!("chunk {}: {message}", stats.index));
                    }
                }
                GamRecordOutcome::Rejected | GamRecordOutcome::Discarded => {}
            }
        }

        self.chunks.push(stats);
    }

    pub fn finish(&mut self, final_path: Option<String>, cancelled: bool) {
        self.final_path = final_path;
        self.cancelled = cancelled;
        self.finished_at = Some(Utc::now());
    }

    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Writes the report as pretty JSON into `dir`, atomically.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        GamIO::write_text_atomic(dir.as_ref().join(REPORT_FILE_NAME), &body)
    }
}
