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

//! # Gam Text Tests - Profanity Guard
//!
//! Tests for the two-pass accept/reject decision.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test profanity
//! ```

use gam::{GamNormalizer, GamProfanityGuard, GamVerdict};

fn guard() -> GamProfanityGuard {
    GamProfanityGuard::new(GamNormalizer::builtin().unwrap()).unwrap()
}

/// Tests that profanity with a rewrite rule is accepted in softened form.
#[test]
fn test_rewritten_profanity_accepted() {
    assert_eq!(
        guard().evaluate("ㅅㅂ 또 늦네"),
        GamVerdict::Accept("진짜 열받는다 또 늦네".to_string())
    );
    assert_eq!(
        guard().evaluate("병신"),
        GamVerdict::Accept("답답한 사람".to_string())
    );
}

/// Tests that an obfuscation with no rewrite rule is rejected.
#[test]
fn test_residual_profanity_rejected() {
    assert_eq!(guard().evaluate("씨1발 뭐야"), GamVerdict::Reject);
    assert_eq!(guard().evaluate("씨.발"), GamVerdict::Reject);
}

/// Tests that clean text is accepted as its normalized form.
#[test]
fn test_clean_text_is_normalized() {
    let g = guard();
    let raw = "오늘 날씨 좋다ㅋㅋ";
    assert!(!g.is_profane(raw));
    assert_eq!(
        g.evaluate(raw),
        GamVerdict::Accept(g.normalizer().normalize(raw))
    );
    assert_eq!(g.evaluate(raw), GamVerdict::Accept("오늘 날씨 좋다 웃음".to_string()));
}

/// Tests that rewrite outputs never trip the signatures.
#[test]
fn test_rewrites_are_clean() {
    let g = guard();
    for raw in ["존나", "ㅈㄴ", "개새끼", "미친", "좆같다", "ㄱㅅㄲ", "ㅆㅂ"] {
        assert!(g.is_profane(raw), "{raw} should match a signature");
        let normalized = g.normalizer().normalize(raw);
        assert!(!g.is_profane(&normalized), "{raw} -> {normalized} still profane");
    }
}
