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

//! # Profanity Guard
//!
//! A small set of high-confidence profanity signatures, checked before and
//! after normalization. Normalization turns obfuscated profanity into
//! readable euphemisms; the second check catches anything the rewrite did not
//! resolve so it never reaches storage.

use regex::Regex;

use crate::errors::{GamError, Result};
use crate::text::normalize::GamNormalizer;

const SIGNATURES: &[&str] = &[
    r"ㅈ+같[다은]",
    r"[ㅅㅆ]+ㅂ",
    r"ㅂ+ㅅ",
    r"ㄱ+ㅅㄲ",
    r"좆",
    r"씨+[\d._*]*[발빨팔]",
    r"미+친",
    r"ㅈ+ㄴ",
    r"존+[나내]",
    r"[병븅빙]+신",
    r"개+[새색쉐]+[끼기]",
];

/// Outcome of [`GamProfanityGuard::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GamVerdict {
    /// Normalized text safe to keep.
    Accept(String),
    /// Profanity survived normalization.
    Reject,
}

#[derive(Debug, Clone)]
pub struct GamProfanityGuard {
    signatures: Vec<Regex>,
    normalizer: GamNormalizer,
}

impl GamProfanityGuard {
    pub fn new(normalizer: GamNormalizer) -> Result<Self> {
        let signatures = SIGNATURES
            .iter()
            .map(|sig| Regex::new(sig).map_err(|err| GamError::pattern(*sig, err.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            signatures,
            normalizer,
        })
    }

    pub fn normalizer(&self) -> &GamNormalizer {
        &self.normalizer
    }

    /// Whether any signature matches `text`.
    pub fn is_profane(&self, text: &str) -> bool {
        self.signatures.iter().any(|sig| sig.is_match(text))
    }

    /// Normalizes `raw` and decides whether the result may be kept.
    pub fn evaluate(&self, raw: &str) -> GamVerdict {
        let normalized = self.normalizer.normalize(raw);
        if self.is_profane(raw) && self.is_profane(&normalized) {
            log::debug!("rejecting comment with residual profanity");
            return GamVerdict::Reject;
        }
        GamVerdict::Accept(normalized)
    }
}
