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

//! # Gam Operator Module
//!
//! The operator trait is the seam between the chunk runner and the
//! per-record work. An operator turns one source record into one
//! [`GamRecordOutcome`]; the runner owns slicing, scheduling, persistence
//! and resume, and never looks inside a record.
//!
//! ## Implementing Custom Operators
//!
//! ```rust
//! use gam::operator::GamOperator;
//! use gam::record::{GamRecord, GamRecordOutcome};
//!
//! #[derive(Debug)]
//! struct LengthOperator;
//!
//! impl GamOperator for LengthOperator {
//!     fn name(&self) -> &'static str {
//!         "comment.length"
//!     }
//!
//!     fn output_headers(&self, _source: &[String]) -> Vec<String> {
//!         vec!["length".to_string()]
//!     }
//!
//!     fn apply_record(&self, record: &GamRecord, _source: &[String]) -> GamRecordOutcome {
//!         let len = record.comment_text().chars().count();
//!         GamRecordOutcome::Accepted { row: vec![Some(len.to_string())], labels: Vec::new() }
//!     }
//! }
//! ```
//!
//! ## Failure Isolation
//!
//! `apply_record` is infallible by signature. A record that cannot be
//! processed is reported as [`GamRecordOutcome::Failed`] carrying a sentinel
//! row, so one bad record never aborts its chunk.

use crate::record::{GamRecord, GamRecordOutcome};

/// Per-record transform driven by the chunk runner.
pub trait GamOperator: std::fmt::Debug + Send + Sync {
    /// Unique, human-readable name for logging and reports.
    fn name(&self) -> &'static str;

    /// Whether records may be processed concurrently on a worker pool.
    ///
    /// Operators backed by a stateful or rate-limited collaborator return
    /// `false` and are driven one record at a time on the calling thread.
    fn parallel_safe(&self) -> bool {
        true
    }

    /// Column names of the rows this operator emits, given the source headers.
    fn output_headers(&self, source_headers: &[String]) -> Vec<String>;

    /// Processes one record. Rows must align with [`Self::output_headers`].
    fn apply_record(&self, record: &GamRecord, source_headers: &[String]) -> GamRecordOutcome;
}

/// Applies `operator` to every record in order on the calling thread.
pub fn execute_operator(
    operator: &dyn GamOperator,
    records: &[GamRecord],
    source_headers: &[String],
) -> Vec<GamRecordOutcome> {
    records
        .iter()
        .map(|record| operator.apply_record(record, source_headers))
        .collect()
}
