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

//! # Gam Core Tests - IO
//!
//! Tests for encoding detection, table loading and atomic CSV writes.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test io
//! ```

use std::fs;
use std::path::PathBuf;

use encoding_rs::EUC_KR;
use gam::{GamError, GamIO};
use tempfile::tempdir;

/// Tests loading a UTF-8 table with passthrough columns and empty cells.
#[test]
fn test_load_table_with_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("comments.csv");
    fs::write(&path, "date,comment,author\n2024-01-01,좋다,kim\n2024-01-02,,\n").unwrap();

    let table = GamIO::load_table(&path).unwrap();
    assert_eq!(table.headers, vec!["date", "comment", "author"]);
    assert_eq!(table.len(), 2);
    assert!(table.has_date());

    let first = &table.records[0];
    assert_eq!(first.comment.as_deref(), Some("좋다"));
    assert_eq!(first.cell("author").as_deref(), Some("kim"));

    let second = &table.records[1];
    assert_eq!(second.date.as_deref(), Some("2024-01-02"));
    assert_eq!(second.comment, None);
    assert_eq!(second.cell("author"), None);
}

/// Tests that a missing comment column is a schema error.
#[test]
fn test_missing_comment_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "date,text\n2024-01-01,hi\n").unwrap();
    assert!(matches!(GamIO::load_table(&path), Err(GamError::Schema { .. })));
}

/// Tests the EUC-KR fallback.
#[test]
fn test_euc_kr_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.csv");
    let (bytes, _, _) = EUC_KR.encode("comment\n기대된다\n");
    fs::write(&path, &bytes).unwrap();

    let table = GamIO::load_table(&path).unwrap();
    assert_eq!(table.records[0].comment.as_deref(), Some("기대된다"));
}

/// Tests that bytes valid under no supported encoding are rejected.
#[test]
fn test_undecodable_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.csv");
    fs::write(&path, b"comment\n\xFF\xFF\n").unwrap();
    assert!(matches!(GamIO::load_table(&path), Err(GamError::Encoding { .. })));
}

/// Tests that a missing file is an IO error.
#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let result = GamIO::load_table(dir.path().join("nope.csv"));
    assert!(matches!(result, Err(GamError::Io(_))));
}

/// Tests atomic writes: empty cells, directory creation, no temp left behind.
#[test]
fn test_write_rows_atomic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("part_0001.csv");
    let headers = vec!["date".to_string(), "comment".to_string()];
    let rows = vec![
        vec![Some("d1".to_string()), Some("a".to_string())],
        vec![None, Some("b".to_string())],
    ];

    GamIO::write_rows_atomic(&path, &headers, &rows).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "date,comment\nd1,a\n,b\n");
    assert!(!dir.path().join("out").join(".part_0001.tmp").exists());
    assert_eq!(GamIO::count_rows(&path).unwrap(), 2);
}

/// Tests concatenation writes the header once and keeps part order.
#[test]
fn test_concat_csv() {
    let dir = tempdir().unwrap();
    let headers = vec!["comment".to_string()];
    let parts: Vec<PathBuf> = (1..=3)
        .map(|i| dir.path().join(GamIO::chunk_file_name("part", i)))
        .collect();
    GamIO::write_rows_atomic(&parts[0], &headers, &[vec![Some("a".into())]]).unwrap();
    GamIO::write_rows_atomic(&parts[1], &headers, &[]).unwrap();
    GamIO::write_rows_atomic(&parts[2], &headers, &[vec![Some("b".into())], vec![Some("c".into())]])
        .unwrap();

    let dest = dir.path().join("final.csv");
    assert_eq!(GamIO::concat_csv(&parts, &dest).unwrap(), 3);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "comment\na\nb\nc\n");
}

/// Tests zero-padded chunk names.
#[test]
fn test_chunk_file_name() {
    assert_eq!(GamIO::chunk_file_name("part", 7), "part_0007.csv");
    assert_eq!(GamIO::chunk_file_name("result", 12345), "result_12345.csv");
}

/// Tests that a failed text write leaves the previous file untouched.
#[test]
fn test_write_text_atomic_keeps_previous_on_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run_report.json");
    GamIO::write_text_atomic(&path, "{\"run\": 1}").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"run\": 1}");
    assert!(!dir.path().join(".run_report.tmp").exists());

    fs::create_dir(dir.path().join(".run_report.tmp")).unwrap();
    assert!(GamIO::write_text_atomic(&path, "{\"run\": 2}").is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"run\": 1}");
}
