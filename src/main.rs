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

//! # Gam CLI (`gam`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gam run --input <csv>...` | Normalize or classify comment tables in resumable chunks |
//! | `gam normalize "<text>"` | Print the normalized, tagged form of one comment |
//!
//! ## Examples
//!
//! ```bash
//! # Normalize a comment export into result_parts/part_0001.csv ... final.csv
//! gam run --input comments.csv
//!
//! # Resume from chunk 12 with 500-record chunks
//! gam run --input comments.csv --chunk-size 500 --start-chunk 12
//!
//! # Zero-shot classification against an inference endpoint
//! gam run --input comments.csv --mode classify --endpoint http://localhost:8080/zero-shot
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use gam::log::{GamLogConfig, GamLogConfigBuilder, GamLogger};
use gam::{GamBatch, GamMode, GamPatternTable, GamRecordProcessor, GamRunConfigBuilder};

/// Korean comment normalization, profanity filtering and emotion tagging.
#[derive(Parser)]
#[command(name = "gam", version, about)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one or more CSV files in fixed-size, resumable chunks.
    ///
    /// Values given on the command line override the config file.
    Run {
        /// Input CSV file with a `comment` column. Repeat for several files.
        #[arg(long = "input", short = 'i')]
        inputs: Vec<PathBuf>,

        /// JSON or YAML run configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        workers: Option<usize>,

        /// 1-based chunk index to resume from.
        #[arg(long)]
        start_chunk: Option<usize>,

        /// `normalize` or `classify`.
        #[arg(long)]
        mode: Option<GamMode>,

        /// Comma-separated label set for classification.
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Pattern table (YAML or JSON) replacing the built-in rules.
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Zero-shot inference endpoint; selects the HTTP classifier.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Normalize and tag a single comment.
    Normalize {
        text: String,

        /// Pattern table (YAML or JSON) replacing the built-in rules.
        #[arg(long)]
        patterns: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            inputs,
            config,
            output_dir,
            chunk_size,
            workers,
            start_chunk,
            mode,
            labels,
            patterns,
            endpoint,
        } => {
            let mut file = match &config {
                Some(path) => GamRunConfigBuilder::load(path)
                    .with_context(|| format!("failed to load {}", path.display()))?,
                None => GamRunConfigBuilder::default(),
            };
            if let Some(endpoint) = endpoint {
                file = file.endpoint(endpoint, std::env::var("GAM_API_KEY").ok());
            }
            let overrides = GamRunConfigBuilder {
                inputs: (!inputs.is_empty()).then_some(inputs),
                output_dir,
                chunk_size,
                workers,
                start_chunk,
                mode,
                labels,
                patterns,
                ..Default::default()
            };
            let config = file.merge(overrides).build()?;
            init_logging(config.log.as_ref(), cli.verbose);

            let batch = GamBatch::new(config.clone())?;
            let reports = batch.run(&config.inputs)?;
            for (input, report) in &reports {
                println!(
                    "{}: {} accepted, {} rejected, {} discarded, {} failed ({} chunks skipped){}",
                    input.display(),
                    report.totals.accepted,
                    report.totals.rejected,
                    report.totals.discarded,
                    report.totals.failed,
                    report.totals.skipped_chunks,
                    report
                        .final_path
                        .as_deref()
                        .map(|p| format!(" -> {p}"))
                        .unwrap_or_default()
                );
            }
        }
        Commands::Normalize { text, patterns } => {
            init_logging(None, cli.verbose);
            let processor = match patterns {
                Some(path) => GamRecordProcessor::with_table(
                    GamPatternTable::from_path(&path)
                        .with_context(|| format!("failed to load {}", path.display()))?
                        .into(),
                )?,
                None => GamRecordProcessor::builtin()?,
            };
            match processor.process_text(&text) {
                Some((comment, _)) => println!("{comment}"),
                None => println!("REJECTED"),
            }
        }
    }

    Ok(())
}

fn init_logging(config: Option<&serde_json::Value>, verbose: bool) {
    let mut config = config
        .map(GamLogConfigBuilder::from_json)
        .unwrap_or_else(GamLogConfig::default);
    if verbose {
        config.level = "DEBUG".to_string();
    }
    GamLogger::init(config);
}
