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

//! # Chunked Batch Runner
//!
//! Partitions a loaded table into fixed-size chunks addressed by a 1-based
//! index and drives each chunk through a [`GamOperator`]:
//!
//! ```text
//! for index in start_chunk..=total_chunks:
//!     output exists      -> skip (complete)
//!     otherwise          -> process -> merge -> persist atomically
//! all chunk files        -> final concatenation (if any row was written)
//! ```
//!
//! Chunk `i` covers records `[(i - 1) * chunk_size, min(i * chunk_size, total))`,
//! so the chunks partition the input exactly. Completion is inferred from the
//! presence of the chunk file; because every file is renamed into place only
//! after a full write, presence implies completeness and a re-run never
//! overwrites a finished chunk.
//!
//! Records inside a chunk run on a dedicated rayon pool when the operator is
//! parallel-safe, using an order-preserving map so outcomes pair positionally
//! with their source records. Otherwise they run one at a time on the calling
//! thread. Chunks themselves always run one after another, so no two writers
//! ever target the same path.
//!
//! A record-level failure becomes a sentinel row. A chunk write failure aborts
//! the run with [`GamError::Chunk`]; earlier chunks stay on disk and are
//! skipped when the run is repeated.

use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::{GamClassifyOperator, GamKeywordClassifier};
use crate::config::{GamClassifierConfig, GamMode, GamRunConfig};
use crate::errors::{GamError, Result};
use crate::io::GamIO;
use crate::metrics::{GamChunkStats, GamRunReport};
use crate::operator::{execute_operator, GamOperator};
use crate::processor::{GamNormalizeOperator, GamRecordProcessor};
use crate::record::{GamRecord, GamRecordOutcome, GamRow, GamTable};
use crate::text::GamPatternTable;

/// Number of chunks needed for `total` records.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    total.div_ceil(chunk_size)
}

/// Record range covered by the chunk with 1-based `index`.
pub fn chunk_bounds(index: usize, chunk_size: usize, total: usize) -> Range<usize> {
    let start = index.saturating_sub(1).saturating_mul(chunk_size).min(total);
    let end = index.saturating_mul(chunk_size).min(total);
    start..end
}

#[derive(Debug)]
pub struct GamChunkRunner {
    operator: Arc<dyn GamOperator>,
    config: GamRunConfig,
    cancel: Option<Arc<AtomicBool>>,
    #[cfg(feature = "parallel")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl GamChunkRunner {
    pub fn new(operator: Arc<dyn GamOperator>, config: GamRunConfig) -> Result<Self> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = if operator.parallel_safe() && config.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .thread_name(|i| format!("gam-worker-{i}"))
                .build()
                .map_err(|e| GamError::internal(format!("failed to start worker pool: {e}")))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            operator,
            config,
            cancel: None,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Stops the run between chunks once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &GamRunConfig {
        &self.config
    }

    /// Whether records are spread over a worker pool.
    #[cfg(feature = "parallel")]
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn is_parallel(&self) -> bool {
        false
    }

    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.config
            .output_dir
            .join(GamIO::chunk_file_name(&self.config.chunk_prefix, index))
    }

    pub fn final_path(&self) -> PathBuf {
        self.config.output_dir.join(&self.config.final_name)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Processes every pending chunk of `table` and concatenates the results.
    pub fn run(&self, table: &GamTable) -> Result<GamRunReport> {
        let total = table.len();
        let chunk_size = self.config.chunk_size;
        let total_chunks = chunk_count(total, chunk_size);
        let headers = self.operator.output_headers(&table.headers);
        fs::create_dir_all(&self.config.output_dir)?;

        log::info!(
            "{}: {} records in {} chunks of {} ({}, from chunk {})",
            self.operator.name(),
            total,
            total_chunks,
            chunk_size,
            if self.is_parallel() { "parallel" } else { "sequential" },
            self.config.start_chunk
        );
        if self.config.start_chunk > total_chunks && total_chunks > 0 {
            log::warn!(
                "start chunk {} is past the last chunk {}; nothing to process",
                self.config.start_chunk,
                total_chunks
            );
        }

        let mut report = GamRunReport::new(self.operator.name(), total, total_chunks);
        let mut cancelled = false;

        for index in self.config.start_chunk..=total_chunks {
            if self.cancelled() {
                log::warn!("run cancelled before chunk {index}");
                cancelled = true;
                break;
            }

            let range = chunk_bounds(index, chunk_size, total);
            let path = self.chunk_path(index);
            if path.exists() {
                log::info!("chunk {index}/{total_chunks} already complete, skipping");
                report.record_chunk(GamChunkStats::skipped(index, range.len()), &[]);
                continue;
            }

            let outcomes = self.process_chunk(&table.records[range], &table.headers);
            let rows: Vec<GamRow> = outcomes.iter().filter_map(|o| o.row().cloned()).collect();
            GamIO::write_rows_atomic(&path, &headers, &rows)
                .map_err(|err| GamError::chunk(index, err.to_string()))?;

            let stats = GamChunkStats::from_outcomes(index, &outcomes);
            log::info!(
                "chunk {index}/{total_chunks} written: {} accepted, {} rejected, {} discarded, {} failed",
                stats.accepted,
                stats.rejected,
                stats.discarded,
                stats.failed
            );
            report.record_chunk(stats, &outcomes);
        }

        let final_path = if cancelled {
            None
        } else {
            self.concat_chunks(total_chunks)?
        };
        report.finish(final_path.map(|p| p.display().to_string()), cancelled);
        report.write_to(&self.config.output_dir)?;
        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn process_chunk(&self, records: &[GamRecord], source_headers: &[String]) -> Vec<GamRecordOutcome> {
        let operator = self.operator.as_ref();
        match &self.pool {
            Some(pool) => pool.install(|| {
                records
                    .par_iter()
                    .map(|record| operator.apply_record(record, source_headers))
                    .collect()
            }),
            None => execute_operator(operator, records, source_headers),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn process_chunk(&self, records: &[GamRecord], source_headers: &[String]) -> Vec<GamRecordOutcome> {
        execute_operator(self.operator.as_ref(), records, source_headers)
    }

    /// Concatenates every chunk file on disk, in index order. Skipped when no
    /// chunk holds a data row.
    fn concat_chunks(&self, total_chunks: usize) -> Result<Option<PathBuf>> {
        let mut parts = Vec::with_capacity(total_chunks);
        let mut rows = 0;
        for index in 1..=total_chunks {
            let path = self.chunk_path(index);
            if path.exists() {
                rows += GamIO::count_rows(&path)?;
                parts.push(path);
            } else {
                log::warn!("chunk {index} has no output; final file will not include it");
            }
        }

        if rows == 0 {
            log::warn!("no chunk produced output rows; skipping final concatenation");
            return Ok(None);
        }

        let dest = self.final_path();
        let written = GamIO::concat_csv(&parts, &dest)?;
        log::info!("{} rows from {} chunks written to {}", written, parts.len(), dest.display());
        Ok(Some(dest))
    }
}

/// Builds the operator a run configuration asks for. The classification
/// collaborator is created here, once per run.
pub fn operator_from_config(config: &GamRunConfig) -> Result<Arc<dyn GamOperator>> {
    match config.mode {
        GamMode::Normalize => {
            let table = match &config.patterns {
                Some(path) => Arc::new(GamPatternTable::from_path(path)?),
                None => GamPatternTable::builtin()?,
            };
            let processor = GamRecordProcessor::with_table(table)?;
            Ok(Arc::new(
                GamNormalizeOperator::new(processor).with_drop_empty(config.drop_empty),
            ))
        }
        GamMode::Classify => {
            let classifier: Arc<dyn crate::classify::GamClassifier> = match &config.classifier {
                GamClassifierConfig::Keyword => Arc::new(GamKeywordClassifier::builtin()?),
                #[cfg(feature = "remote")]
                GamClassifierConfig::Http {
                    endpoint,
                    api_key,
                    timeout_secs,
                } => Arc::new(crate::classify::GamHttpClassifier::new(
                    endpoint.clone(),
                    api_key.clone(),
                    *timeout_secs,
                )?),
                #[cfg(not(feature = "remote"))]
                GamClassifierConfig::Http { .. } => {
                    return Err(GamError::validation(
                        "http classifier requires the 'remote' feature",
                    ))
                }
            };
            Ok(Arc::new(GamClassifyOperator::new(
                classifier,
                config.labels.clone(),
            )))
        }
    }
}

/// Runs one or more input files with a shared operator.
///
/// A single input writes straight into `output_dir`. Several inputs each get
/// a subdirectory named after the file stem, so two inputs with the same stem
/// are refused before anything runs; an input that cannot be loaded is
/// logged and skipped while the others continue.
#[derive(Debug)]
pub struct GamBatch {
    config: GamRunConfig,
    operator: Arc<dyn GamOperator>,
    cancel: Option<Arc<AtomicBool>>,
}

impl GamBatch {
    pub fn new(config: GamRunConfig) -> Result<Self> {
        config.validate()?;
        let operator = operator_from_config(&config)?;
        Ok(Self::with_operator(config, operator))
    }

    pub fn with_operator(config: GamRunConfig, operator: Arc<dyn GamOperator>) -> Self {
        GamBatch {
            config,
            operator,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn operator(&self) -> &dyn GamOperator {
        self.operator.as_ref()
    }

    /// Runs every input in `inputs`, in order.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<Vec<(PathBuf, GamRunReport)>> {
        if inputs.is_empty() {
            return Err(GamError::validation("no input files given"));
        }
        let single = inputs.len() == 1;
        if !single {
            let mut dirs: HashMap<String, &PathBuf> = HashMap::with_capacity(inputs.len());
            for input in inputs {
                let stem = file_stem(input);
                if let Some(first) = dirs.insert(stem.clone(), input) {
                    return Err(GamError::validation(format!(
                        "{} and {} would share the output directory '{stem}'",
                        first.display(),
                        input.display()
                    )));
                }
            }
        }
        let mut reports = Vec::with_capacity(inputs.len());

        for input in inputs {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
            {
                log::warn!("batch cancelled before {}", input.display());
                break;
            }

            let table = match self.load(input) {
                Ok(table) => table,
                Err(err) if !single => {
                    log::warn!("skipping {}: {}", input.display(), err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let output_dir = if single {
                self.config.output_dir.clone()
            } else {
                self.config.output_dir.join(file_stem(input))
            };
            let config = GamRunConfig {
                output_dir,
                ..self.config.clone()
            };

            let mut runner = GamChunkRunner::new(Arc::clone(&self.operator), config)?;
            if let Some(flag) = &self.cancel {
                runner = runner.with_cancel(Arc::clone(flag));
            }
            let report = runner.run(&table)?;
            reports.push((input.clone(), report));
        }

        Ok(reports)
    }

    fn load(&self, input: &Path) -> Result<GamTable> {
        let mut table = GamIO::load_table(input)?;
        if self.config.mode == GamMode::Classify {
            let dropped = table.drop_missing_comments();
            if dropped > 0 {
                log::info!("{}: dropped {} rows without a comment", input.display(), dropped);
            }
        }
        Ok(table)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}
