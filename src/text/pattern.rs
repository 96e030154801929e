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

//! # Pattern Table
//!
//! Ordered `(match, replacement)` rules for slang, profanity, abbreviations
//! and emoticons. Rules are applied one after another, each rule seeing the
//! output of the previous one, so the order of the table is part of its
//! meaning.
//!
//! ## Precedence
//!
//! Groups run in the order severe profanity, social slurs, slang and
//! abbreviations, emoticons. Inside a family the narrow rule comes first and
//! the broad catch-all last (`좆같다` before `좆`, `\^_\^` before
//! `[-~_^]{2,}`), so the specific rewrite wins whenever both could fire.
//!
//! Two rules with an identical match pattern are rejected when the table is
//! built. A pattern that fails to compile is logged and skipped; it never
//! aborts normalization of a record.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{GamError, Result};

/// Intent of a rule. Documentation only; it is not a processing boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamRuleGroup {
    SevereProfanity,
    SocialSlur,
    #[default]
    Slang,
    Emoticon,
}

/// One `(match, replacement)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamPatternRule {
    pub pattern: String,
    pub replacement: String,
    #[serde(default)]
    pub group: GamRuleGroup,
}

impl GamPatternRule {
    pub fn new(
        group: GamRuleGroup,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            group,
        }
    }
}

use GamRuleGroup::{Emoticon, SevereProfanity, Slang, SocialSlur};

const BUILTIN_RULES: &[(GamRuleGroup, &str, &str)] = &[
    // severe profanity
    (SevereProfanity, r"좆같[다은]", "짜증난다"),
    (SevereProfanity, r"ㅈ+같[다은]", "짜증난다"),
    (SevereProfanity, r"좆", "정말 싫은"),
    (SevereProfanity, r"씨+발", "정말 화가 난"),
    (SevereProfanity, r"ㅆ+ㅂ", "진짜 열받는다"),
    (SevereProfanity, r"ㅅ+ㅂ", "진짜 열받는다"),
    (SevereProfanity, r"개+[새색쉐]+[끼기]", "불쾌한 사람"),
    (SevereProfanity, r"ㄱ+ㅅㄲ", "불쾌한 사람"),
    (SevereProfanity, r"[병븅빙]신", "답답한 사람"),
    (SevereProfanity, r"ㅂ+ㅅ", "답답한 사람"),
    (SevereProfanity, r"미친[놈년]", "이상한 사람"),
    (SevereProfanity, r"미+친", "말도 안 되는"),
    (SevereProfanity, r"존+[나내]", "진짜"),
    (SevereProfanity, r"ㅈ+ㄴ", "진짜"),
    (SevereProfanity, r"졸+라", "매우"),
    (SevereProfanity, r"개+같[다은]", "매우 짜증나는"),
    // political and social slurs
    (SocialSlur, r"한남충", "남성"),
    (SocialSlur, r"[김된]치녀|된장녀", "여성"),
    (SocialSlur, r"틀딱충?", "노인"),
    (SocialSlur, r"맘충", "부모"),
    (SocialSlur, r"급식충", "학생"),
    (SocialSlur, r"일베충", "일베 이용자"),
    (SocialSlur, r"개독", "개신교인"),
    (SocialSlur, r"개돼지", "대중"),
    (SocialSlur, r"좌빨|좌좀", "진보 성향"),
    (SocialSlur, r"수구꼴통", "보수 성향"),
    (SocialSlur, r"수꼴", "보수 성향"),
    // slang and abbreviations
    (Slang, r"핵노잼", "매우 재미없다"),
    (Slang, r"노잼", "재미없다"),
    (Slang, r"꿀잼", "재미있다"),
    (Slang, r"존맛", "매우 맛있다"),
    (Slang, r"존잘", "매우 잘생긴"),
    (Slang, r"존예", "매우 예쁜"),
    (Slang, r"갓겜", "훌륭한 게임"),
    (Slang, r"킹받", "열받"),
    (Slang, r"레알", "정말"),
    (Slang, r"실화냐", "믿기지 않는다"),
    (Slang, r"어그로", "관심 끌기"),
    (Slang, r"ㅉ{2,}", "짜증나"),
    (Slang, r"ㅇㅈ", "인정"),
    (Slang, r"ㄱㅅ", "감사"),
    (Slang, r"ㅊㅋ", "축하"),
    (Slang, r"ㅇㅋ", "오케이"),
    (Slang, r"ㄴㄴ", "아니"),
    (Slang, r"ㅇㅇ", "응"),
    (Slang, r"ㄹㅇ", "진짜"),
    (Slang, r"ㅁㅊ", "말도 안 되는"),
    (Slang, r"ㅈㅅ", "죄송"),
    (Slang, r"ㄷㄷ", "놀랍다"),
    // emoticons and repeated symbols
    (Emoticon, r"\^_\^|\^\^", " 웃음 "),
    (Emoticon, r"[tㅠㅜ]_[tㅠㅜ]", " 슬픔 "),
    (Emoticon, r">_<", " "),
    (Emoticon, r"ㅇ_ㅇ", " "),
    (Emoticon, r"ㅡ\.ㅡ|-_-", " "),
    (Emoticon, r"[-~_^]{2,}", " "),
    (Emoticon, r"ㅡ+", " "),
    (Emoticon, r"~", " "),
    (Emoticon, r"\b(?:헐|읭|엥|아놔)\b", " "),
];

static BUILTIN: OnceLock<Arc<GamPatternTable>> = OnceLock::new();

/// Immutable, validated rule sequence.
#[derive(Debug, Clone)]
pub struct GamPatternTable {
    rules: Vec<GamPatternRule>,
    compiled: Vec<Option<Regex>>,
}

impl GamPatternTable {
    /// Builds the built-in table.
    pub fn build() -> Result<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(group, pattern, replacement)| GamPatternRule::new(*group, *pattern, *replacement))
            .collect();
        Self::from_rules(rules)
    }

    /// Process-wide built-in table, constructed on first use.
    pub fn builtin() -> Result<Arc<Self>> {
        if let Some(table) = BUILTIN.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(Self::build()?);
        Ok(Arc::clone(BUILTIN.get_or_init(|| table)))
    }

    /// Validates and compiles an ordered rule list.
    pub fn from_rules(rules: Vec<GamPatternRule>) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(rules.len());
            for rule in &rules {
                if !seen.insert(rule.pattern.as_str()) {
                    return Err(GamError::pattern(
                        rule.pattern.clone(),
                        "duplicate match pattern would shadow an earlier rule",
                    ));
                }
            }
        }

        let compiled = rules
            .iter()
            .map(|rule| match Regex::new(&rule.pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    log::warn!("skipping malformed pattern rule '{}': {}", rule.pattern, err);
                    None
                }
            })
            .collect();

        Ok(Self { rules, compiled })
    }

    /// Loads an ordered rule list from YAML.
    ///
    /// ```yaml
    /// - pattern: "ㅅ+ㅂ"
    ///   replacement: "진짜 열받는다"
    ///   group: severe_profanity
    /// ```
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let rules: Vec<GamPatternRule> = serde_yaml::from_str(source)?;
        Self::from_rules(rules)
    }

    /// Loads a rule list from a YAML or JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let rules: Vec<GamPatternRule> = serde_json::from_str(&source)?;
                Self::from_rules(rules)
            }
            _ => Self::from_yaml_str(&source),
        }
    }

    /// Applies every usable rule in table order.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (rule, compiled) in self.rules.iter().zip(&self.compiled) {
            if let Some(re) = compiled {
                if re.is_match(&out) {
                    out = re.replace_all(&out, rule.replacement.as_str()).into_owned();
                }
            }
        }
        out
    }

    pub fn rules(&self) -> &[GamPatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules that failed to compile and are skipped.
    pub fn skipped(&self) -> usize {
        self.compiled.iter().filter(|c| c.is_none()).count()
    }
}
