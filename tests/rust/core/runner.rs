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

//! # Gam Core Tests - Chunk Runner
//!
//! Tests for chunk partitioning, resume by file presence, classification
//! sentinels, cancellation and multi-file batches.
//!
//! ## Test Categories
//!
//! - **Partition Tests**: chunk files and final concatenation
//! - **Resume Tests**: skipping completed chunks
//! - **Failure Tests**: sentinel rows and chunk write failures
//! - **Batch Tests**: multi-file runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test runner
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use gam::{
    GamBatch, GamChunkRunner, GamClassification, GamClassifier, GamClassifyOperator, GamError,
    GamIO, GamKeywordClassifier, GamMode, GamNormalizeOperator, GamOperator, GamRecord,
    GamRecordProcessor, GamRunConfig, GamTable, Result,
};
use tempfile::tempdir;

fn table(comments: &[Option<&str>]) -> GamTable {
    let records = comments
        .iter()
        .enumerate()
        .map(|(i, c)| GamRecord::new(Some(format!("2024-01-{:02}", i + 1)), c.map(str::to_string)))
        .collect();
    GamTable::new(vec!["date".to_string(), "comment".to_string()], records)
}

fn config(dir: &Path, chunk_size: usize, workers: usize) -> GamRunConfig {
    GamRunConfig::builder()
        .output_dir(dir)
        .chunk_size(chunk_size)
        .workers(workers)
        .build()
        .unwrap()
}

fn normalize_operator() -> Arc<dyn GamOperator> {
    Arc::new(GamNormalizeOperator::new(GamRecordProcessor::builtin().unwrap()))
}

fn five_comments() -> GamTable {
    table(&[
        Some("댓글 하나"),
        Some("댓글 둘"),
        Some("댓글 셋"),
        Some("댓글 넷"),
        Some("댓글 다섯"),
    ])
}

/// Tests that a chunk size of 2 over 5 records yields chunks of 2, 2 and 1.
#[test]
fn test_chunk_files_partition_input() {
    let dir = tempdir().unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1)).unwrap();
    let report = runner.run(&five_comments()).unwrap();

    assert_eq!(report.total_chunks, 3);
    let sizes: Vec<usize> = (1..=3)
        .map(|i| GamIO::count_rows(runner.chunk_path(i)).unwrap())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let final_path = runner.final_path();
    assert_eq!(report.final_path, Some(final_path.display().to_string()));
    assert_eq!(
        fs::read_to_string(&final_path).unwrap(),
        "date,comment\n2024-01-01,댓글 하나\n2024-01-02,댓글 둘\n2024-01-03,댓글 셋\n2024-01-04,댓글 넷\n2024-01-05,댓글 다섯\n"
    );
    assert!(dir.path().join("run_report.json").exists());
}

/// Tests that deleting only the last chunk reprocesses only that chunk.
#[test]
fn test_resume_reprocesses_missing_chunk() {
    let dir = tempdir().unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1)).unwrap();
    let data = five_comments();
    runner.run(&data).unwrap();
    let first_final = fs::read_to_string(runner.final_path()).unwrap();

    fs::remove_file(runner.chunk_path(3)).unwrap();
    let report = runner.run(&data).unwrap();

    assert_eq!(report.totals.skipped_chunks, 2);
    assert_eq!(report.totals.processed_chunks, 1);
    assert_eq!(report.chunks[2].index, 3);
    assert!(!report.chunks[2].skipped);
    assert_eq!(fs::read_to_string(runner.final_path()).unwrap(), first_final);
}

/// Tests that a fully complete run does no reprocessing and yields the same output.
#[test]
fn test_rerun_is_noop() {
    let dir = tempdir().unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1)).unwrap();
    let data = five_comments();
    runner.run(&data).unwrap();
    let first_final = fs::read_to_string(runner.final_path()).unwrap();

    let report = runner.run(&data).unwrap();
    assert_eq!(report.totals.processed_chunks, 0);
    assert_eq!(report.totals.skipped_chunks, 3);
    assert_eq!(fs::read_to_string(runner.final_path()).unwrap(), first_final);
}

/// Tests that only surviving records are persisted.
#[test]
fn test_rejected_and_discarded_are_dropped() {
    let dir = tempdir().unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 10, 1)).unwrap();
    let report = runner
        .run(&table(&[Some("행복하다"), Some("씨1발"), None, Some("@@")]))
        .unwrap();

    assert_eq!(report.totals.accepted, 1);
    assert_eq!(report.totals.rejected, 1);
    assert_eq!(report.totals.discarded, 2);
    assert_eq!(report.emotion_counts.get("긍정"), Some(&1));
    assert_eq!(GamIO::count_rows(runner.final_path()).unwrap(), 1);
}

/// Tests that no final file is written when every record is filtered.
#[test]
fn test_no_final_without_rows() {
    let dir = tempdir().unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1)).unwrap();
    let report = runner.run(&table(&[Some("씨1발"), None, Some("@@")])).unwrap();

    assert!(runner.chunk_path(1).exists());
    assert!(runner.chunk_path(2).exists());
    assert!(!runner.final_path().exists());
    assert_eq!(report.final_path, None);
}

/// Tests that parallel and sequential execution write identical output.
#[test]
fn test_parallel_matches_sequential() {
    let comments: Vec<String> = (0..40)
        .map(|i| match i % 4 {
            0 => format!("개좋다 {i} ㅋㅋㅋ"),
            1 => format!("불편하다 {i}"),
            2 => "씨1발".to_string(),
            _ => format!("댓글 {i}"),
        })
        .collect();
    let refs: Vec<Option<&str>> = comments.iter().map(|c| Some(c.as_str())).collect();
    let data = table(&refs);

    let seq_dir = tempdir().unwrap();
    let par_dir = tempdir().unwrap();
    let seq = GamChunkRunner::new(normalize_operator(), config(seq_dir.path(), 7, 1)).unwrap();
    let par = GamChunkRunner::new(normalize_operator(), config(par_dir.path(), 7, 4)).unwrap();
    seq.run(&data).unwrap();
    par.run(&data).unwrap();

    assert_eq!(
        fs::read_to_string(seq.final_path()).unwrap(),
        fs::read_to_string(par.final_path()).unwrap()
    );
}

/// Tests that a start chunk past the first leaves earlier chunks untouched.
#[test]
fn test_start_chunk() {
    let dir = tempdir().unwrap();
    let cfg = GamRunConfig::builder()
        .output_dir(dir.path())
        .chunk_size(2)
        .workers(1)
        .start_chunk(2)
        .build()
        .unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), cfg).unwrap();
    let report = runner.run(&five_comments()).unwrap();

    assert!(!runner.chunk_path(1).exists());
    assert!(runner.chunk_path(2).exists());
    assert_eq!(report.chunks.len(), 2);
    assert_eq!(GamIO::count_rows(runner.final_path()).unwrap(), 3);
}

/// Tests that a set cancel flag stops the run before any chunk.
#[test]
fn test_cancelled_run() {
    let dir = tempdir().unwrap();
    let flag = Arc::new(AtomicBool::new(true));
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1))
        .unwrap()
        .with_cancel(flag);
    let report = runner.run(&five_comments()).unwrap();

    assert!(report.cancelled);
    assert!(report.chunks.is_empty());
    assert!(!runner.chunk_path(1).exists());
    assert!(!runner.final_path().exists());
}

/// Tests that a chunk that cannot be written aborts the run with its index.
#[test]
fn test_chunk_write_failure() {
    let dir = tempdir().unwrap();
    // A directory in place of the temporary file makes the write fail.
    fs::create_dir_all(dir.path().join(".part_0002.tmp")).unwrap();
    let runner = GamChunkRunner::new(normalize_operator(), config(dir.path(), 2, 1)).unwrap();

    let err = runner.run(&five_comments()).unwrap_err();
    assert!(matches!(err, GamError::Chunk { index: 2, .. }));
    assert!(runner.chunk_path(1).exists());
    assert!(!runner.chunk_path(2).exists());
    assert!(!runner.final_path().exists());
}

#[derive(Debug)]
struct FlakyClassifier;

impl GamClassifier for FlakyClassifier {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn classify(&self, text: &str, labels: &[String]) -> Result<GamClassification> {
        if text.contains("fail") {
            return Err(GamError::classification("model unavailable"));
        }
        GamClassification::new(vec![labels[0].clone()], vec![0.9])
    }

    fn parallel_safe(&self) -> bool {
        false
    }
}

/// Tests that classifier failures become sentinel rows and the run continues.
#[test]
fn test_classification_sentinel() {
    let dir = tempdir().unwrap();
    let labels = vec!["긍정".to_string(), "중립".to_string()];
    let op = Arc::new(GamClassifyOperator::new(Arc::new(FlakyClassifier), labels));
    let runner = GamChunkRunner::new(op, config(dir.path(), 2, 4)).unwrap();
    assert!(!runner.is_parallel());

    let report = runner
        .run(&table(&[Some("ok"), Some("please fail"), Some("ok again")]))
        .unwrap();
    assert_eq!(report.totals.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        fs::read_to_string(runner.final_path()).unwrap(),
        "date,comment,top_emotion,긍정,중립\n\
         2024-01-01,ok,긍정,0.9,\n\
         2024-01-02,please fail,error,,\n\
         2024-01-03,ok again,긍정,0.9,\n"
    );
}

/// Tests keyword classification output columns.
#[test]
fn test_keyword_classification_columns() {
    let dir = tempdir().unwrap();
    let labels: Vec<String> = gam::DEFAULT_LABELS.iter().map(|s| s.to_string()).collect();
    let op = Arc::new(GamClassifyOperator::new(
        Arc::new(GamKeywordClassifier::builtin().unwrap()),
        labels,
    ));
    let runner = GamChunkRunner::new(op, config(dir.path(), 10, 2)).unwrap();
    runner.run(&table(&[Some("기대된다"), Some("점심")])).unwrap();

    let content = fs::read_to_string(runner.final_path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "date,comment,top_emotion,긍정,비판,분노,불안,기대,중립");
    assert!(lines[1].starts_with("2024-01-01,기대된다,기대,"));
    assert!(lines[2].starts_with("2024-01-02,점심,중립,"));
}

fn write_input(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Tests multi-file batches: one subdirectory per input, unreadable input skipped.
#[test]
fn test_batch_multiple_inputs() {
    let input_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let a = write_input(input_dir.path(), "news_a.csv", "date,comment\nd1,좋다\n");
    let b = write_input(input_dir.path(), "news_b.csv", "date,comment\nd1,불편하다\nd2,무난\n");
    let missing = input_dir.path().join("missing.csv");

    let batch = GamBatch::new(config(out_dir.path(), 1, 1)).unwrap();
    let reports = batch.run(&[a, missing, b]).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(out_dir.path().join("news_a").join("final.csv").exists());
    assert_eq!(
        GamIO::count_rows(out_dir.path().join("news_b").join("final.csv")).unwrap(),
        2
    );
    assert!(!out_dir.path().join("missing").exists());
}

/// Tests that a single unreadable input fails the batch.
#[test]
fn test_batch_single_missing_input() {
    let out_dir = tempdir().unwrap();
    let batch = GamBatch::new(config(out_dir.path(), 10, 1)).unwrap();
    let result = batch.run(&[out_dir.path().join("missing.csv")]);
    assert!(matches!(result, Err(GamError::Io(_))));
}

/// Tests that classification batches drop rows without a comment first.
#[test]
fn test_batch_classify_drops_missing_comments() {
    let input_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let input = write_input(input_dir.path(), "c.csv", "date,comment\nd1,행복\nd2,\nd3,무난\n");
    let cfg = GamRunConfig::builder()
        .output_dir(out_dir.path())
        .mode(GamMode::Classify)
        .workers(1)
        .build()
        .unwrap();

    let reports = GamBatch::new(cfg).unwrap().run(&[input]).unwrap();
    assert_eq!(reports[0].1.total_records, 2);
    assert_eq!(GamIO::count_rows(out_dir.path().join("final.csv")).unwrap(), 2);
}

/// Tests that inputs sharing a file stem are refused before any chunk is written.
#[test]
fn test_batch_rejects_shared_stems() {
    let input_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    fs::create_dir(input_dir.path().join("a")).unwrap();
    fs::create_dir(input_dir.path().join("b")).unwrap();
    let a = write_input(&input_dir.path().join("a"), "news.csv", "date,comment\nd1,좋다\n");
    let b = write_input(
        &input_dir.path().join("b"),
        "news.csv",
        "date,comment\nd1,불편하다\nd2,무난\n",
    );

    let batch = GamBatch::new(config(out_dir.path(), 1, 1)).unwrap();
    let result = batch.run(&[a, b]);

    assert!(matches!(result, Err(GamError::Validation { .. })));
    assert!(!out_dir.path().join("news").exists());
}

/// Tests that normalize mode keeps every source column next to the new comment.
#[test]
fn test_normalize_keeps_source_columns() {
    let input_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let input = write_input(
        input_dir.path(),
        "posts.csv",
        "date,comment,author,likes\nd1,좋다,kim,3\nd2,씨1발,lee,\nd3,무난,,7\n",
    );

    let batch = GamBatch::new(config(out_dir.path(), 2, 1)).unwrap();
    batch.run(&[input]).unwrap();

    assert_eq!(
        fs::read_to_string(out_dir.path().join("final.csv")).unwrap(),
        "date,comment,author,likes\nd1,좋다 (감정: 긍정),kim,3\nd3,무난 (감정: 중립),,7\n"
    );
}
