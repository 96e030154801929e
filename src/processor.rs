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

//! # Record Processor
//!
//! Composes the profanity guard, the normalizer and the emotion tagger into
//! the per-record transform:
//!
//! ```text
//! comment -> guard.evaluate -> REJECT                 => None
//!                           -> ACCEPT(normalized)     => tag -> normalized + suffix
//! ```
//!
//! An absent comment is processed as the empty string and typically yields
//! an empty accepted comment. [`GamNormalizeOperator`] decides whether such
//! rows are kept.

use std::sync::Arc;

use crate::errors::Result;
use crate::operator::GamOperator;
use crate::record::{GamProcessedRecord, GamRecord, GamRecordOutcome, COMMENT_COLUMN};
use crate::text::{
    GamEmotionTagger, GamNormalizer, GamPatternTable, GamProfanityGuard, GamVerdict,
};

#[derive(Debug, Clone)]
pub struct GamRecordProcessor {
    guard: GamProfanityGuard,
    tagger: GamEmotionTagger,
}

impl GamRecordProcessor {
    pub fn new(guard: GamProfanityGuard, tagger: GamEmotionTagger) -> Self {
        Self { guard, tagger }
    }

    /// Processor over the given pattern table.
    pub fn with_table(table: Arc<GamPatternTable>) -> Result<Self> {
        let normalizer = GamNormalizer::new(table)?;
        Ok(Self::new(
            GamProfanityGuard::new(normalizer)?,
            GamEmotionTagger::new()?,
        ))
    }

    /// Processor over the built-in pattern table.
    pub fn builtin() -> Result<Self> {
        Self::with_table(GamPatternTable::builtin()?)
    }

    pub fn guard(&self) -> &GamProfanityGuard {
        &self.guard
    }

    pub fn tagger(&self) -> &GamEmotionTagger {
        &self.tagger
    }

    /// Processes one comment text. `None` means the guard rejected it.
    pub fn process_text(&self, text: &str) -> Option<(String, Vec<String>)> {
        match self.guard.evaluate(text) {
            GamVerdict::Reject => None,
            GamVerdict::Accept(normalized) => {
                let emotions = self.tagger.tag(&normalized);
                let comment = format!("{normalized}{}", GamEmotionTagger::suffix(&emotions));
                let labels = emotions.iter().map(|e| e.label().to_string()).collect();
                Some((comment, labels))
            }
        }
    }

    /// Processes one record. `None` means the record was rejected.
    pub fn process(&self, record: &GamRecord) -> Option<GamProcessedRecord> {
        let (comment, emotions) = self.process_text(record.comment_text())?;
        Some(GamProcessedRecord {
            date: record.date.clone(),
            comment,
            emotions,
        })
    }
}

/// Normalization-mode operator: emits every source column, with the final
/// text in the `comment` slot.
#[derive(Debug, Clone)]
pub struct GamNormalizeOperator {
    processor: GamRecordProcessor,
    drop_empty: bool,
}

impl GamNormalizeOperator {
    pub fn new(processor: GamRecordProcessor) -> Self {
        Self {
            processor,
            drop_empty: true,
        }
    }

    /// Whether accepted records with an empty final comment are discarded.
    pub fn with_drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = drop_empty;
        self
    }

    pub fn processor(&self) -> &GamRecordProcessor {
        &self.processor
    }
}

impl GamOperator for GamNormalizeOperator {
    fn name(&self) -> &'static str {
        "comment.normalize"
    }

    fn output_headers(&self, source_headers: &[String]) -> Vec<String> {
        source_headers.to_vec()
    }

    fn apply_record(&self, record: &GamRecord, source_headers: &[String]) -> GamRecordOutcome {
        let Some(processed) = self.processor.process(record) else {
            return GamRecordOutcome::Rejected;
        };
        if self.drop_empty && processed.comment.is_empty() {
            return GamRecordOutcome::Discarded;
        }

        let mut comment = Some(processed.comment);
        let row = source_headers
            .iter()
            .map(|h| {
                if h == COMMENT_COLUMN {
                    comment.take()
                } else {
                    record.cell(h)
                }
            })
            .collect();
        GamRecordOutcome::Accepted {
            row,
            labels: processed.emotions,
        }
    }
}
