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

//! # Gam Configuration
//!
//! Run configuration for the chunked batch runner. A [`GamRunConfigBuilder`]
//! holds every field as optional so that values from a JSON/YAML file, and
//! then from the command line, can be overlaid before [`GamRunConfigBuilder::build`]
//! fills defaults and validates the result.
//!
//! ```yaml
//! inputs: [comments.csv]
//! output_dir: result_parts
//! chunk_size: 1000
//! mode: classify
//! labels: [긍정, 비판, 분노, 불안, 기대, 중립]
//! classifier:
//!   kind: http
//!   endpoint: http://localhost:8080/zero-shot
//!   timeout_secs: 30
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::DEFAULT_LABELS;
use crate::errors::{GamError, Result};

/// What the runner does to each record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamMode {
    /// Profanity guard, normalizer and emotion tagger.
    #[default]
    Normalize,
    /// Classification collaborator over a fixed label set.
    Classify,
}

impl FromStr for GamMode {
    type Err = GamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normalize" => Ok(GamMode::Normalize),
            "classify" => Ok(GamMode::Classify),
            other => Err(GamError::validation(format!("unknown mode '{other}'"))),
        }
    }
}

impl fmt::Display for GamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamMode::Normalize => f.write_str("normalize"),
            GamMode::Classify => f.write_str("classify"),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Which classification collaborator a classify run uses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GamClassifierConfig {
    #[default]
    Keyword,
    Http {
        endpoint: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

/// Validated run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamRunConfig {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub workers: usize,
    /// 1-based index of the first chunk to consider.
    pub start_chunk: usize,
    pub mode: GamMode,
    pub labels: Vec<String>,
    pub chunk_prefix: String,
    pub final_name: String,
    /// Discard accepted records whose final comment is empty.
    pub drop_empty: bool,
    pub classifier: GamClassifierConfig,
    /// Replacement pattern table (YAML or JSON).
    pub patterns: Option<PathBuf>,
    /// Logger settings, read with [`crate::log::GamLogConfigBuilder::from_json`].
    pub log: Option<Value>,
}

impl Default for GamRunConfig {
    fn default() -> Self {
        GamRunConfig {
            inputs: Vec::new(),
            output_dir: PathBuf::from("result_parts"),
            chunk_size: 1000,
            workers: num_cpus::get().max(1),
            start_chunk: 1,
            mode: GamMode::default(),
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            chunk_prefix: "part".to_string(),
            final_name: "final.csv".to_string(),
            drop_empty: true,
            classifier: GamClassifierConfig::default(),
            patterns: None,
            log: None,
        }
    }
}

impl GamRunConfig {
    pub fn builder() -> GamRunConfigBuilder {
        GamRunConfigBuilder::default()
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        GamRunConfigBuilder::load(path)?.build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(GamError::validation("chunk_size must be greater than zero"));
        }
        if self.start_chunk == 0 {
            return Err(GamError::validation("start_chunk is 1-based and must be at least 1"));
        }
        if self.workers == 0 {
            return Err(GamError::validation("workers must be at least 1"));
        }
        if self.chunk_prefix.is_empty() || self.final_name.is_empty() {
            return Err(GamError::validation("chunk_prefix and final_name must be non-empty"));
        }
        if self.mode == GamMode::Classify {
            if self.labels.is_empty() {
                return Err(GamError::validation("classify mode needs at least one label"));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = self.labels.iter().find(|l| !seen.insert(l.as_str())) {
                return Err(GamError::validation(format!("label '{dup}' is listed twice")));
            }
        }
        if let GamClassifierConfig::Http { endpoint, .. } = &self.classifier {
            if endpoint.trim().is_empty() {
                return Err(GamError::validation("http classifier needs an endpoint"));
            }
        }
        Ok(())
    }
}

/// Partial configuration; unset fields take their defaults on build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GamRunConfigBuilder {
    pub inputs: Option<Vec<PathBuf>>,
    pub output_dir: Option<PathBuf>,
    pub chunk_size: Option<usize>,
    pub workers: Option<usize>,
    pub start_chunk: Option<usize>,
    pub mode: Option<GamMode>,
    pub labels: Option<Vec<String>>,
    pub chunk_prefix: Option<String>,
    pub final_name: Option<String>,
    pub drop_empty: Option<bool>,
    pub classifier: Option<GamClassifierConfig>,
    pub patterns: Option<PathBuf>,
    pub log: Option<Value>,
}

impl GamRunConfigBuilder {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Reads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|err| GamError::Io(format!("{}: {err}", path.display())))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&source)?),
            Some("yaml") | Some("yml") => Self::from_yaml(&source),
            _ => Err(GamError::validation(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Overlays every field set in `other` onto `self`.
    pub fn merge(self, other: GamRunConfigBuilder) -> Self {
        GamRunConfigBuilder {
            inputs: other.inputs.or(self.inputs),
            output_dir: other.output_dir.or(self.output_dir),
            chunk_size: other.chunk_size.or(self.chunk_size),
            workers: other.workers.or(self.workers),
            start_chunk: other.start_chunk.or(self.start_chunk),
            mode: other.mode.or(self.mode),
            labels: other.labels.or(self.labels),
            chunk_prefix: other.chunk_prefix.or(self.chunk_prefix),
            final_name: other.final_name.or(self.final_name),
            drop_empty: other.drop_empty.or(self.drop_empty),
            classifier: other.classifier.or(self.classifier),
            patterns: other.patterns.or(self.patterns),
            log: other.log.or(self.log),
        }
    }

    pub fn inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn start_chunk(mut self, index: usize) -> Self {
        self.start_chunk = Some(index);
        self
    }

    pub fn mode(mut self, mode: GamMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = Some(drop_empty);
        self
    }

    pub fn classifier(mut self, classifier: GamClassifierConfig) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Points the classifier at an HTTP endpoint. An `api_key` and
    /// `timeout_secs` already configured for HTTP are kept; `api_key` only
    /// fills a missing key.
    pub fn endpoint(mut self, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let endpoint = endpoint.into();
        self.classifier = Some(match self.classifier.take() {
            Some(GamClassifierConfig::Http {
                api_key: configured,
                timeout_secs,
                ..
            }) => GamClassifierConfig::Http {
                endpoint,
                api_key: configured.or(api_key),
                timeout_secs,
            },
            _ => GamClassifierConfig::Http {
                endpoint,
                api_key,
                timeout_secs: default_timeout_secs(),
            },
        });
        self
    }

    pub fn patterns(mut self, path: impl Into<PathBuf>) -> Self {
        self.patterns = Some(path.into());
        self
    }

    pub fn build(self) -> Result<GamRunConfig> {
        let base = GamRunConfig::default();
        let config = GamRunConfig {
            inputs: self.inputs.unwrap_or(base.inputs),
            output_dir: self.output_dir.unwrap_or(base.output_dir),
            chunk_size: self.chunk_size.unwrap_or(base.chunk_size),
            workers: self.workers.unwrap_or(base.workers),
            start_chunk: self.start_chunk.unwrap_or(base.start_chunk),
            mode: self.mode.unwrap_or(base.mode),
            labels: self.labels.unwrap_or(base.labels),
            chunk_prefix: self.chunk_prefix.unwrap_or(base.chunk_prefix),
            final_name: self.final_name.unwrap_or(base.final_name),
            drop_empty: self.drop_empty.unwrap_or(base.drop_empty),
            classifier: self.classifier.unwrap_or(base.classifier),
            patterns: self.patterns.or(base.patterns),
            log: self.log.or(base.log),
        };
        config.validate()?;
        Ok(config)
    }
}
