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

//! # Gam Record Module
//!
//! Data structures for comments as they are loaded from a source table and
//! as they leave the per-record transform.
//!
//! A [`GamRecord`] is read once and never mutated afterwards. Operators
//! produce a [`GamRecordOutcome`] per record, which the chunk runner pairs
//! positionally with the source record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the required free-text column.
pub const COMMENT_COLUMN: &str = "comment";

/// Name of the optional passthrough timestamp column.
pub const DATE_COLUMN: &str = "date";

/// Passthrough columns other than `date` and `comment`, in source order.
pub type GamMetadata = Map<String, Value>;

/// One output row, aligned with the operator's output headers. `None` cells
/// are written as empty fields.
pub type GamRow = Vec<Option<String>>;

/// Raw comment record as loaded from the input table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamRecord {
    /// Opaque timestamp string, passed through untouched.
    pub date: Option<String>,

    /// Free-form comment text; `None` when the cell was empty.
    pub comment: Option<String>,

    /// Remaining source columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GamMetadata>,
}

impl GamRecord {
    /// Constructs a record with the given date and comment.
    pub fn new(date: Option<String>, comment: Option<String>) -> Self {
        GamRecord {
            date,
            comment,
            metadata: None,
        }
    }

    /// Attaches passthrough metadata to the record.
    pub fn with_metadata(mut self, metadata: GamMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a mutable reference to the metadata map, creating it if necessary.
    pub fn metadata_mut(&mut self) -> &mut GamMetadata {
        self.metadata.get_or_insert_with(GamMetadata::new)
    }

    /// Comment text with an absent value coerced to the empty string.
    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Resolves a source column by name.
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            DATE_COLUMN => self.date.clone(),
            COMMENT_COLUMN => self.comment.clone(),
            other => self
                .metadata
                .as_ref()
                .and_then(|meta| meta.get(other))
                .and_then(|value| match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    v => Some(v.to_string()),
                }),
        }
    }
}

/// Convenience alias for working on batches of records.
pub type GamRecordBatch = Vec<GamRecord>;

/// Result of the guard -> normalizer -> tagger composition for one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamProcessedRecord {
    pub date: Option<String>,
    /// Normalized text, with the emotion suffix appended when any category matched.
    pub comment: String,
    /// Emotion category labels, in reporting order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
}

/// Per-record result produced by an operator.
#[derive(Clone, Debug, PartialEq)]
pub enum GamRecordOutcome {
    /// Row to persist, plus the labels it was tagged with.
    Accepted { row: GamRow, labels: Vec<String> },
    /// Profanity survived normalization; the record is dropped.
    Rejected,
    /// Empty or unusable input; the record is dropped.
    Discarded,
    /// The record failed; `row` is the sentinel persisted in its place.
    Failed { row: GamRow, message: String },
}

impl GamRecordOutcome {
    /// Row to persist for this outcome, if any.
    pub fn row(&self) -> Option<&GamRow> {
        match self {
            GamRecordOutcome::Accepted { row, .. } | GamRecordOutcome::Failed { row, .. } => {
                Some(row)
            }
            GamRecordOutcome::Rejected | GamRecordOutcome::Discarded => None,
        }
    }
}

/// Loaded input table: header names in source order plus records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamTable {
    pub headers: Vec<String>,
    pub records: GamRecordBatch,
}

impl GamTable {
    pub fn new(headers: Vec<String>, records: GamRecordBatch) -> Self {
        GamTable { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source carried a `date` column.
    pub fn has_date(&self) -> bool {
        self.headers.iter().any(|h| h == DATE_COLUMN)
    }

    /// Drops records whose comment is absent. Returns how many were removed.
    pub fn drop_missing_comments(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|record| {
            record
                .comment
                .as_deref()
                .map(|c| !c.trim().is_empty())
                .unwrap_or(false)
        });
        before - self.records.len()
    }
}
