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

//! # Gam Text Module
//!
//! Per-comment text processing: the ordered pattern table, the normalizer
//! built on top of it, the two-pass profanity guard and the keyword emotion
//! tagger. Everything here is pure and shares only immutable tables, so the
//! types are cheap to clone into worker threads.

pub mod emotion;
pub mod normalize;
pub mod pattern;
pub mod profanity;

pub use emotion::{GamEmotion, GamEmotionTagger};
pub use normalize::{GamNormalizer, LAUGHTER_MARKER, SADNESS_MARKER};
pub use pattern::{GamPatternRule, GamPatternTable, GamRuleGroup};
pub use profanity::{GamProfanityGuard, GamVerdict};
