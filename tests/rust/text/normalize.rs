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

//! # Gam Text Tests - Normalizer
//!
//! Tests for the pattern table and the normalizer built on it.
//!
//! ## Test Categories
//!
//! - **Rewrite Tests**: slang, profanity and slur rules
//! - **Collapse Tests**: laughter/crying markers, vowel and punctuation runs
//! - **Table Tests**: custom tables, validation and rule ordering
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test normalize
//! ```

use std::sync::Arc;

use gam::{GamError, GamNormalizer, GamPatternRule, GamPatternTable, GamRuleGroup};

fn normalize(text: &str) -> String {
    GamNormalizer::builtin().unwrap().normalize(text)
}

/// Tests the intensifier prefix and a laughter run in one comment.
#[test]
fn test_intensifier_and_laughter() {
    assert_eq!(normalize("존나 개좋다 ㅋㅋㅋㅋ"), "진짜 매우 좋다 웃음");
}

/// Tests that abbreviations and slang expand.
#[test]
fn test_slang_expansion() {
    assert_eq!(normalize("ㅇㅈ 꿀잼"), "인정 재미있다");
}

/// Tests that slurs are replaced by neutral group names.
#[test]
fn test_social_slur_rewrite() {
    assert_eq!(normalize("급식충 또 왔네"), "학생 또 왔네");
}

/// Tests that ordinary words ending in 충 keep their form.
#[test]
fn test_common_chung_words_kept() {
    assert_eq!(normalize("대충 봤다"), "대충 봤다");
    assert_eq!(normalize("절충 가능"), "절충 가능");
    assert_eq!(normalize("진상충 또 왔네"), "진상 사람 또 왔네");
}

/// Tests that emoticons map to markers or disappear.
#[test]
fn test_emoticons() {
    assert_eq!(normalize("좋아 ^^"), "좋아 웃음");
    assert_eq!(normalize("ㅠㅠ 힘들다"), "슬픔 힘들다");
}

/// Tests terminal punctuation and vowel-glyph run collapsing.
#[test]
fn test_run_collapsing() {
    assert_eq!(normalize("뭐야!!!???"), "뭐야!?");
    assert_eq!(normalize("아ㅏㅏㅏ 좋다"), "아ㅏ 좋다");
}

/// Tests that symbols outside the allowed set become whitespace.
#[test]
fn test_symbols_stripped() {
    assert_eq!(normalize("좋아요♥♥ @@"), "좋아요");
    assert_eq!(normalize("   "), "");
}

/// Tests case folding of Latin text.
#[test]
fn test_lowercase() {
    assert_eq!(normalize("LOL 좋다"), "lol 좋다");
}

/// Tests that the same input always yields the same output.
#[test]
fn test_deterministic() {
    let normalizer = GamNormalizer::builtin().unwrap();
    let text = "ㅅㅂ 개웃기네 ㅋㅋㅋ~~ 레알";
    assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
}

/// Tests that rules observe the output of earlier rules.
#[test]
fn test_custom_table_is_sequential() {
    let table = GamPatternTable::from_rules(vec![
        GamPatternRule::new(GamRuleGroup::Slang, "ㄱㄱ", "고고"),
        GamPatternRule::new(GamRuleGroup::Slang, "고고", "가자"),
    ])
    .unwrap();
    let normalizer = GamNormalizer::new(Arc::new(table)).unwrap();
    assert_eq!(normalizer.normalize("ㄱㄱ"), "가자");
}

/// Tests that duplicate match patterns fail table construction.
#[test]
fn test_duplicate_rule_rejected() {
    let yaml = "- pattern: \"ㄱㄱ\"\n  replacement: \"고고\"\n- pattern: \"ㄱㄱ\"\n  replacement: \"가자\"\n";
    let err = GamPatternTable::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, GamError::Pattern { .. }));
}

/// Tests that a malformed rule is skipped without aborting normalization.
#[test]
fn test_malformed_rule_skipped() {
    let table = GamPatternTable::from_rules(vec![
        GamPatternRule::new(GamRuleGroup::Slang, "[", "x"),
        GamPatternRule::new(GamRuleGroup::Slang, "ㅇㅋ", "오케이"),
    ])
    .unwrap();
    assert_eq!(table.skipped(), 1);
    let normalizer = GamNormalizer::new(Arc::new(table)).unwrap();
    assert_eq!(normalizer.normalize("ㅇㅋ"), "오케이");
}

/// Tests that the built-in table keeps severe profanity ahead of emoticons.
#[test]
fn test_builtin_group_order() {
    let table = GamPatternTable::build().unwrap();
    let groups: Vec<GamRuleGroup> = table.rules().iter().map(|r| r.group).collect();
    let mut sorted = groups.clone();
    sorted.sort_by_key(|g| match g {
        GamRuleGroup::SevereProfanity => 0,
        GamRuleGroup::SocialSlur => 1,
        GamRuleGroup::Slang => 2,
        GamRuleGroup::Emoticon => 3,
    });
    assert_eq!(groups, sorted);
}
