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

//! # Classification Collaborator
//!
//! Scores a comment against a fixed label set. The collaborator is an opaque
//! service: it returns labels ranked by confidence with parallel scores, or
//! fails. A failure never escapes a record; [`GamClassifyOperator`] turns it
//! into the sentinel row `top_emotion = "error"` with empty scores.
//!
//! Two collaborators ship with Gam:
//!
//! - [`GamKeywordClassifier`]: CPU-only lexicon scoring, safe to run on a
//!   worker pool.
//! - `GamHttpClassifier` (feature `remote`): a zero-shot inference endpoint
//!   called over blocking HTTP with a per-request timeout. It is driven
//!   sequentially and built once per run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{GamError, Result};
use crate::operator::GamOperator;
use crate::record::{GamRecord, GamRecordOutcome, GamRow};
use crate::text::{GamEmotion, GamEmotionTagger};

/// Column holding the highest-ranked label.
pub const TOP_EMOTION_COLUMN: &str = "top_emotion";

/// `top_emotion` value written for a record whose classification failed.
pub const SENTINEL_EMOTION: &str = "error";

/// Label set used when none is configured.
pub const DEFAULT_LABELS: [&str; 6] = ["긍정", "비판", "분노", "불안", "기대", "중립"];

/// Ranked labels with parallel confidence scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamClassification {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl GamClassification {
    /// Validates that labels and scores line up.
    pub fn new(labels: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(GamError::classification(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Ok(Self { labels, scores })
    }

    pub fn top(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn score_of(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|idx| self.scores.get(idx).copied())
    }

    /// `top_emotion` followed by one score per configured label, in
    /// configured order. Labels the collaborator did not score are empty.
    pub fn to_row(&self, labels: &[String]) -> GamRow {
        let mut row = Vec::with_capacity(labels.len() + 1);
        row.push(self.top().map(str::to_string));
        row.extend(
            labels
                .iter()
                .map(|label| self.score_of(label).map(|s| s.to_string())),
        );
        row
    }

    /// Row written in place of a failed classification.
    pub fn sentinel_row(labels: &[String]) -> GamRow {
        let mut row = Vec::with_capacity(labels.len() + 1);
        row.push(Some(SENTINEL_EMOTION.to_string()));
        row.extend(labels.iter().map(|_| None));
        row
    }
}

/// Text classifier over a caller-supplied label set.
pub trait GamClassifier: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(&self, text: &str, labels: &[String]) -> Result<GamClassification>;

    /// Whether the classifier may be shared across worker threads.
    fn parallel_safe(&self) -> bool {
        true
    }
}

/// Lexicon-based scorer.
///
/// Each label scores the share of emotion-keyword hits that belong to it.
/// Labels without a lexicon category always score zero. A text with no hits
/// ranks `중립` first when it is in the label set, otherwise spreads the
/// score evenly.
#[derive(Debug, Clone)]
pub struct GamKeywordClassifier {
    tagger: GamEmotionTagger,
}

impl GamKeywordClassifier {
    pub fn new(tagger: GamEmotionTagger) -> Self {
        Self { tagger }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(GamEmotionTagger::new()?))
    }
}

impl GamClassifier for GamKeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn classify(&self, text: &str, labels: &[String]) -> Result<GamClassification> {
        if labels.is_empty() {
            return Err(GamError::classification("label set is empty"));
        }

        let hits = self.tagger.hits(text);
        let counts: Vec<usize> = labels
            .iter()
            .map(|label| {
                GamEmotion::from_label(label)
                    .and_then(|emotion| hits.iter().find(|(e, _)| *e == emotion))
                    .map(|(_, n)| *n)
                    .unwrap_or(0)
            })
            .collect();
        let total: usize = counts.iter().sum();

        let neutral = GamEmotion::Neutral.label();
        let scores: Vec<f64> = if total > 0 {
            counts.iter().map(|&n| n as f64 / total as f64).collect()
        } else if labels.iter().any(|l| l == neutral) {
            labels
                .iter()
                .map(|l| if l == neutral { 1.0 } else { 0.0 })
                .collect()
        } else {
            vec![1.0 / labels.len() as f64; labels.len()]
        };

        let mut ranked: Vec<(String, f64)> = labels.iter().cloned().zip(scores).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = ranked.into_iter().unzip();
        GamClassification::new(labels, scores)
    }
}

#[cfg(feature = "remote")]
pub use remote::GamHttpClassifier;

#[cfg(feature = "remote")]
mod remote {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::{GamClassification, GamClassifier};
    use crate::errors::{GamError, Result};

    /// Zero-shot classification over HTTP.
    ///
    /// Sends `{"inputs": text, "parameters": {"candidate_labels": [...]}}` and
    /// expects `{"labels": [...], "scores": [...]}` (or a one-element list of
    /// such objects).
    #[derive(Debug)]
    pub struct GamHttpClassifier {
        endpoint: String,
        api_key: Option<String>,
        client: reqwest::blocking::Client,
    }

    impl GamHttpClassifier {
        pub fn new(
            endpoint: impl Into<String>,
            api_key: Option<String>,
            timeout_secs: u64,
        ) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|e| GamError::internal(format!("failed to build http client: {e}")))?;
            Ok(Self {
                endpoint: endpoint.into(),
                api_key,
                client,
            })
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }

        pub(crate) fn parse_response(json: &Value) -> Result<GamClassification> {
            let body = match json {
                Value::Array(items) => items.first().ok_or_else(|| {
                    GamError::classification("classifier returned an empty list")
                })?,
                other => other,
            };
            if let Some(err) = body.get("error").and_then(Value::as_str) {
                return Err(GamError::classification(err.to_string()));
            }

            let labels = body
                .get("labels")
                .and_then(Value::as_array)
                .ok_or_else(|| GamError::classification("response has no 'labels' array"))?
                .iter()
                .map(|l| {
                    l.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| GamError::classification("non-string label"))
                })
                .collect::<Result<Vec<_>>>()?;
            let scores = body
                .get("scores")
                .and_then(Value::as_array)
                .ok_or_else(|| GamError::classification("response has no 'scores' array"))?
                .iter()
                .map(|s| {
                    s.as_f64()
                        .ok_or_else(|| GamError::classification("non-numeric score"))
                })
                .collect::<Result<Vec<_>>>()?;

            GamClassification::new(labels, scores)
        }
    }

    impl GamClassifier for GamHttpClassifier {
        fn name(&self) -> &'static str {
            "http"
        }

        fn classify(&self, text: &str, labels: &[String]) -> Result<GamClassification> {
            let body = json!({
                "inputs": text,
                "parameters": { "candidate_labels": labels },
            });

            let mut request = self.client.post(&self.endpoint).json(&body);
            if let Some(api_key) = &self.api_key {
                request = request.bearer_auth(api_key);
            }

            let response = request
                .send()
                .map_err(|e| GamError::classification(format!("request failed: {e}")))?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                return Err(GamError::classification(format!(
                    "endpoint returned {status}: {body}"
                )));
            }

            let json: Value = response
                .json()
                .map_err(|e| GamError::classification(format!("invalid response body: {e}")))?;
            Self::parse_response(&json)
        }

        fn parallel_safe(&self) -> bool {
            false
        }
    }

}

/// Classification-mode operator: emits every source column followed by
/// `top_emotion` and one score column per label.
#[derive(Debug, Clone)]
pub struct GamClassifyOperator {
    classifier: Arc<dyn GamClassifier>,
    labels: Vec<String>,
}

impl GamClassifyOperator {
    pub fn new(classifier: Arc<dyn GamClassifier>, labels: Vec<String>) -> Self {
        Self { classifier, labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn classifier(&self) -> &dyn GamClassifier {
        self.classifier.as_ref()
    }
}

impl GamOperator for GamClassifyOperator {
    fn name(&self) -> &'static str {
        "comment.classify"
    }

    fn parallel_safe(&self) -> bool {
        self.classifier.parallel_safe()
    }

    fn output_headers(&self, source_headers: &[String]) -> Vec<String> {
        let mut headers = source_headers.to_vec();
        headers.push(TOP_EMOTION_COLUMN.to_string());
        headers.extend(self.labels.iter().cloned());
        headers
    }

    fn apply_record(&self, record: &GamRecord, source_headers: &[String]) -> GamRecordOutcome {
        let mut row: GamRow = source_headers.iter().map(|h| record.cell(h)).collect();
        match self.classifier.classify(record.comment_text(), &self.labels) {
            Ok(result) => {
                let labels = result.top().map(str::to_string).into_iter().collect();
                row.extend(result.to_row(&self.labels));
                GamRecordOutcome::Accepted { row, labels }
            }
            Err(err) => {
                log::warn!("{} classifier failed on a record: {}", self.classifier.name(), err);
                row.extend(GamClassification::sentinel_row(&self.labels));
                GamRecordOutcome::Failed {
                    row,
                    message: err.to_string(),
                }
            }
        }
    }
}
