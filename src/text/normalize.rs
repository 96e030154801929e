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

//! # Normalizer
//!
//! Rewrites one comment into its canonical form. The steps always run in
//! this order:
//!
//! 1. lower-case the input
//! 2. apply the pattern table, rule by rule
//! 3. soften the `개` intensifier prefix and neutralize derogatory suffixes
//! 4. collapse laughter/crying glyph runs into markers, long vowel-glyph runs
//!    and repeated terminal punctuation
//! 5. replace every character outside word characters, whitespace, `.?!` and
//!    Hangul with a space
//! 6. squeeze whitespace runs and trim
//!
//! The output depends only on the input and the table. Normalization is not
//! idempotent; apply it exactly once per record.

use std::sync::Arc;

use regex::{Captures, Regex};

use crate::errors::{GamError, Result};
use crate::text::pattern::GamPatternTable;

/// Marker substituted for runs of `ㅋ`/`ㅎ`.
pub const LAUGHTER_MARKER: &str = "웃음";

/// Marker substituted for runs of `ㅠ`/`ㅜ`.
pub const SADNESS_MARKER: &str = "슬픔";

const INTENSIFIER_SOFTENED: &str = "매우";
const SUFFIX_NEUTRAL: &str = "사람";

// Words that merely start with 개. Includes the output of slur rewrites
// (개신교인) so the prefix step never splits them.
const INTENSIFIER_PROTECTED: &[&str] = &[
    "개신교", "개인", "개선", "개발", "개념", "개최", "개정", "개혁", "개방", "개월", "개봉",
    "개성", "개입", "개별", "개척", "개편", "개표", "개헌", "개학", "개장", "개시", "개업",
    "개국", "개그", "개미", "개구리", "개나리", "개수", "개체", "개요", "개막", "개설", "개통",
    "개강", "개화", "개간", "개조", "개명", "개관", "개찰",
];

// 개 followed by a particle is the noun "dog", not the prefix.
const NOUN_PARTICLES: &[&str] = &[
    "가", "는", "도", "를", "랑", "와", "의", "야", "만", "한테", "에게", "보다", "처럼", "들",
];

const SUFFIX_PROTECTED: &[&str] = &[
    "곤충", "해충", "보충", "기생충", "확충", "회충", "유충", "성충", "방충", "요충", "충충",
    "대충", "이충", "상충", "절충", "완충",
];

/// Pure text normalizer bound to one pattern table.
#[derive(Debug, Clone)]
pub struct GamNormalizer {
    table: Arc<GamPatternTable>,
    intensifier: Regex,
    suffix: Regex,
    laughter: Regex,
    crying: Regex,
    disallowed: Regex,
    whitespace: Regex,
}

impl GamNormalizer {
    /// Creates a normalizer over the given table.
    pub fn new(table: Arc<GamPatternTable>) -> Result<Self> {
        Ok(Self {
            table,
            intensifier: compile(r"(^|\s)개([가-힣]+)")?,
            suffix: compile(r"\b([가-힣]+?)(충|놈|새끼)\b")?,
            laughter: compile(r"[ㅋㅎ]{2,}")?,
            crying: compile(r"[ㅠㅜ]{2,}")?,
            disallowed: compile(r"[^\w\s.?!ㄱ-ㅎㅏ-ㅣ가-힣]")?,
            whitespace: compile(r"\s{2,}")?,
        })
    }

    /// Creates a normalizer over the built-in table.
    pub fn builtin() -> Result<Self> {
        Self::new(GamPatternTable::builtin()?)
    }

    pub fn table(&self) -> &GamPatternTable {
        &self.table
    }

    /// Normalizes one text unit.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let rewritten = self.table.apply(&lowered);
        let affixed = self.rewrite_affixes(&rewritten);
        let collapsed = self.collapse(&affixed);
        let stripped = self.disallowed.replace_all(&collapsed, " ");
        self.whitespace
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }

    fn rewrite_affixes(&self, text: &str) -> String {
        let prefixed = self.intensifier.replace_all(text, |caps: &Captures| {
            let lead = &caps[1];
            let rest = &caps[2];
            let word = &caps[0][lead.len()..];
            if INTENSIFIER_PROTECTED.iter().any(|stem| word.starts_with(stem))
                || NOUN_PARTICLES.contains(&rest)
            {
                caps[0].to_string()
            } else {
                format!("{lead}{INTENSIFIER_SOFTENED} {rest}")
            }
        });

        self.suffix
            .replace_all(&prefixed, |caps: &Captures| {
                if SUFFIX_PROTECTED.contains(&&caps[0]) {
                    caps[0].to_string()
                } else {
                    format!("{} {SUFFIX_NEUTRAL}", &caps[1])
                }
            })
            .into_owned()
    }

    fn collapse(&self, text: &str) -> String {
        let marked = self
            .laughter
            .replace_all(text, format!(" {LAUGHTER_MARKER} ").as_str())
            .into_owned();
        let marked = self
            .crying
            .replace_all(&marked, format!(" {SADNESS_MARKER} ").as_str())
            .into_owned();
        let vowels = collapse_runs(&marked, 3, is_vowel_glyph);
        collapse_runs(&vowels, 2, |c| matches!(c, '.' | '?' | '!' | ','))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| GamError::pattern(pattern, err.to_string()))
}

fn is_vowel_glyph(c: char) -> bool {
    ('ㅏ'..='ㅣ').contains(&c)
}

/// Replaces every run of at least `min_run` identical characters matching
/// `pred` with a single instance.
fn collapse_runs(text: &str, min_run: usize, pred: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let keep = if pred(c) && run >= min_run { 1 } else { run };
        for _ in 0..keep {
            out.push(c);
        }
    }
    out
}
