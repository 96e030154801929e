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

//! # Gam Core Library
//!
//! Gam normalizes Korean social-media comments, filters residual profanity,
//! tags emotions, and drives the work over large comment tables in
//! fixed-size, resumable chunks.
//!
//! ## Module Overview
//!
//! - **text**: pattern table, normalizer, profanity guard and emotion tagger
//! - **record**: raw records, processed records and per-record outcomes
//! - **processor**: the guard -> normalizer -> tagger composition
//! - **classify**: classification collaborators and the classify operator
//! - **operator**: the per-record operator trait driven by the runner
//! - **runner**: chunked batch runner and multi-file batches
//! - **io**: encoding detection, CSV loading and atomic CSV writes
//! - **config**: run configuration and its file loaders
//! - **metrics**: chunk statistics and the run report
//! - **log**: structured logger behind the `log` facade
//!
//! ## Feature Flags
//!
//! - `parallel`: order-preserving parallel record processing with rayon
//! - `remote`: HTTP zero-shot classification collaborator
//! - `full`: enables all features (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use gam::{GamRecord, GamRecordProcessor};
//!
//! let processor = GamRecordProcessor::builtin()?;
//! let record = GamRecord::new(None, Some("존나 개좋다 ㅋㅋㅋㅋ".to_string()));
//! let processed = processor.process(&record).expect("accepted");
//! assert_eq!(processed.comment, "진짜 매우 좋다 웃음 (감정: 긍정)");
//! # Ok::<(), gam::GamError>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `Result<T, GamError>`. Record-level problems
//! never surface as errors during a batch run; they become rejected,
//! discarded or sentinel outcomes and are counted in the run report.

pub mod classify;
pub mod config;
pub mod errors;
pub mod io;
pub mod log;
pub mod metrics;
pub mod operator;
pub mod processor;
pub mod record;
pub mod runner;
pub mod text;

pub use classify::{
    GamClassification, GamClassifier, GamClassifyOperator, GamKeywordClassifier, DEFAULT_LABELS,
    SENTINEL_EMOTION, TOP_EMOTION_COLUMN,
};
#[cfg(feature = "remote")]
pub use classify::GamHttpClassifier;
pub use config::{GamClassifierConfig, GamMode, GamRunConfig, GamRunConfigBuilder};
pub use errors::{GamError, Result};
pub use io::GamIO;
pub use metrics::{GamChunkStats, GamRunReport, GamRunTotals};
pub use operator::{execute_operator, GamOperator};
pub use processor::{GamNormalizeOperator, GamRecordProcessor};
pub use record::{
    GamMetadata, GamProcessedRecord, GamRecord, GamRecordBatch, GamRecordOutcome, GamRow,
    GamTable,
};
pub use runner::{chunk_bounds, chunk_count, operator_from_config, GamBatch, GamChunkRunner};
pub use text::{
    GamEmotion, GamEmotionTagger, GamNormalizer, GamPatternRule, GamPatternTable,
    GamProfanityGuard, GamRuleGroup, GamVerdict,
};
