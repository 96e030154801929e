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

//! # Emotion Tagger
//!
//! Keyword dictionary lookup over normalized text. A category is reported
//! when any of its representative keywords occurs as a substring; each
//! category appears at most once and categories are ordered by label.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{GamError, Result};

/// Closed set of emotion categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamEmotion {
    Positive,
    Anticipation,
    Criticism,
    Disappointment,
    Anger,
    Neutral,
}

impl GamEmotion {
    pub const ALL: [GamEmotion; 6] = [
        GamEmotion::Positive,
        GamEmotion::Anticipation,
        GamEmotion::Criticism,
        GamEmotion::Disappointment,
        GamEmotion::Anger,
        GamEmotion::Neutral,
    ];

    /// Label written into output text and label sets.
    pub fn label(&self) -> &'static str {
        match self {
            GamEmotion::Positive => "긍정",
            GamEmotion::Anticipation => "기대",
            GamEmotion::Criticism => "비판",
            GamEmotion::Disappointment => "실망",
            GamEmotion::Anger => "분노",
            GamEmotion::Neutral => "중립",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            GamEmotion::Positive => &[
                "좋다", "기쁘다", "만족", "행복", "사랑", "감사", "즐겁다", "잘했다", "칭찬",
                "훌륭하다",
            ],
            GamEmotion::Anticipation => &[
                "기대", "설레다", "기다리다", "희망", "바라다", "궁금하다", "흥미", "관심",
                "기대감", "희망적",
            ],
            GamEmotion::Criticism => &[
                "문제", "부족", "개선", "지적", "비효율", "불편", "불만", "우려", "불확실",
                "의문",
            ],
            GamEmotion::Disappointment => &[
                "실망", "아쉽다", "후회", "짜증", "지치다", "불쾌", "낙담", "짜증나다", "허탈",
                "한숨",
            ],
            GamEmotion::Anger => &[
                "화나다", "열받다", "짜증", "빡치다", "분노", "역겹다", "폭발", "싫다", "짜증나",
                "폭력적",
            ],
            GamEmotion::Neutral => &[
                "그렇다", "그냥", "보통", "평범", "무난", "잘모르겠다", "아무생각없다", "중립",
                "평범하다", "일반적",
            ],
        }
    }
}

impl fmt::Display for GamEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated keyword dictionary.
#[derive(Debug, Clone)]
pub struct GamEmotionTagger {
    entries: Vec<(GamEmotion, Vec<&'static str>)>,
}

impl GamEmotionTagger {
    /// Builds the dictionary, rejecting a keyword listed twice in one category.
    pub fn new() -> Result<Self> {
        let mut entries = Vec::with_capacity(GamEmotion::ALL.len());
        for emotion in GamEmotion::ALL {
            let mut seen = HashSet::new();
            for keyword in emotion.keywords() {
                if !seen.insert(*keyword) {
                    return Err(GamError::validation(format!(
                        "keyword '{keyword}' listed twice for {emotion}"
                    )));
                }
            }
            entries.push((emotion, emotion.keywords().to_vec()));
        }
        Ok(Self { entries })
    }

    /// Matched categories, ordered by label.
    pub fn tag(&self, text: &str) -> Vec<GamEmotion> {
        let mut found: Vec<GamEmotion> = self
            .entries
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(emotion, _)| *emotion)
            .collect();
        found.sort_by_key(|e| e.label());
        found
    }

    /// Number of distinct keywords of each category found in `text`.
    pub fn hits(&self, text: &str) -> Vec<(GamEmotion, usize)> {
        self.entries
            .iter()
            .map(|(emotion, keywords)| {
                (*emotion, keywords.iter().filter(|kw| text.contains(*kw)).count())
            })
            .collect()
    }

    /// `" (감정: a, b)"`, or empty when no category matched.
    pub fn suffix(emotions: &[GamEmotion]) -> String {
        if emotions.is_empty() {
            return String::new();
        }
        let labels: Vec<&str> = emotions.iter().map(|e| e.label()).collect();
        format!(" (감정: {})", labels.join(", "))
    }
}
