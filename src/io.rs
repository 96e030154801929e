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

//! # Gam IO Module
//!
//! CSV ingestion with encoding detection, and atomic CSV persistence for
//! chunk outputs and the final concatenation.
//!
//! Input files are decoded as UTF-8 first (a leading BOM is stripped) and
//! fall back to EUC-KR/CP949, the encoding most legacy Korean comment exports
//! use. Every file Gam writes goes to a hidden `.{stem}.tmp` sibling and is
//! renamed into place only after a successful flush, so the presence of an
//! output file always implies it is complete.

use std::borrow::Cow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer, WriterBuilder};
use encoding_rs::{Encoding, EUC_KR, UTF_8};
use serde_json::Value;

use crate::errors::{GamError, Result};
use crate::record::{GamMetadata, GamRecord, GamRow, GamTable, COMMENT_COLUMN, DATE_COLUMN};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// IO façade exposing the loaders and writers used by the batch runner.
pub struct GamIO;

impl GamIO {
    /// Returns the first supported encoding under which `bytes` decode
    /// without errors.
    pub fn detect_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if std::str::from_utf8(body).is_ok() {
            return Some(UTF_8);
        }
        EUC_KR
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|_| EUC_KR)
    }

    /// Decodes `bytes`, reporting `origin` when no encoding fits.
    pub fn decode<'a>(bytes: &'a [u8], origin: &str) -> Result<(Cow<'a, str>, &'static Encoding)> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if let Ok(text) = std::str::from_utf8(body) {
            return Ok((Cow::Borrowed(text), UTF_8));
        }
        match EUC_KR.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => Ok((text, EUC_KR)),
            None => Err(GamError::encoding(
                origin,
                "content is neither valid UTF-8 nor EUC-KR",
            )),
        }
    }

    /// Loads a CSV table with a required `comment` column.
    ///
    /// `date` is optional; any other column is kept as passthrough metadata
    /// in source order. Empty cells load as absent values.
    pub fn load_table(path: impl AsRef<Path>) -> Result<GamTable> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|err| GamError::Io(format!("{}: {err}", path.display())))?;
        let (text, encoding) = Self::decode(&bytes, &path.display().to_string())?;
        log::debug!("decoded {} as {}", path.display(), encoding.name());
        Self::parse_table(&text)
    }

    /// Parses CSV text into a [`GamTable`].
    pub fn parse_table(text: &str) -> Result<GamTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let comment_idx = headers
            .iter()
            .position(|h| h == COMMENT_COLUMN)
            .ok_or_else(|| {
                GamError::schema(format!("input requires a '{COMMENT_COLUMN}' column"))
            })?;
        let date_idx = headers.iter().position(|h| h == DATE_COLUMN);

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let cell = |idx: usize| {
                row.get(idx)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };

            let mut record = GamRecord::new(date_idx.and_then(cell), cell(comment_idx));
            let mut metadata = GamMetadata::new();
            for (idx, name) in headers.iter().enumerate() {
                if idx == comment_idx || Some(idx) == date_idx {
                    continue;
                }
                let value = cell(idx).map(Value::String).unwrap_or(Value::Null);
                metadata.insert(name.clone(), value);
            }
            if !metadata.is_empty() {
                record = record.with_metadata(metadata);
            }
            records.push(record);
        }

        Ok(GamTable::new(headers, records))
    }

    /// File name of the chunk with 1-based `index`.
    pub fn chunk_file_name(prefix: &str, index: usize) -> String {
        format!("{prefix}_{index:04}.csv")
    }

    /// Writes `headers` and `rows` to `path` through a temporary sibling.
    pub fn write_rows_atomic(path: impl AsRef<Path>, headers: &[String], rows: &[GamRow]) -> Result<()> {
        Self::write_atomic(path.as_ref(), |writer| {
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
            }
            Ok(rows.len())
        })
        .map(|_| ())
    }

    /// Concatenates CSV `parts` in order into `dest`, writing the header of
    /// the first part once. Returns the number of data rows written.
    pub fn concat_csv(parts: &[PathBuf], dest: impl AsRef<Path>) -> Result<usize> {
        Self::write_atomic(dest.as_ref(), |writer| {
            let mut header: Option<csv::StringRecord> = None;
            let mut rows = 0;
            for part in parts {
                let mut reader = ReaderBuilder::new().has_headers(true).from_path(part)?;
                let part_header = reader.headers()?.clone();
                if let Some(existing) = &header {
                    if *existing != part_header {
                        return Err(GamError::schema(format!(
                            "{} has columns that differ from the first part",
                            part.display()
                        )));
                    }
                } else {
                    writer.write_record(&part_header)?;
                    header = Some(part_header);
                }
                for record in reader.records() {
                    writer.write_record(&record?)?;
                    rows += 1;
                }
            }
            Ok(rows)
        })
    }

    /// Number of data rows in a CSV file written by Gam.
    pub fn count_rows(path: impl AsRef<Path>) -> Result<usize> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let mut rows = 0;
        for record in reader.records() {
            record?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Writes `contents` to `path` through a temporary sibling.
    pub fn write_text_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
        Self::commit_atomic(path.as_ref(), |temp| Ok(fs::write(temp, contents)?))
    }

    fn write_atomic<F>(path: &Path, write: F) -> Result<usize>
    where
        F: FnOnce(&mut Writer<File>) -> Result<usize>,
    {
        Self::commit_atomic(path, |temp| {
            let mut writer = WriterBuilder::new().from_path(temp)?;
            let rows = write(&mut writer)?;
            writer.flush()?;
            Ok(rows)
        })
    }

    /// Runs `write` against the temporary sibling of `path`, then renames it
    /// into place. The temporary file is removed when `write` fails.
    fn commit_atomic<T, F>(path: &Path, write: F) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = temp_path(path);
        match write(&temp_path) {
            Ok(value) => {
                fs::rename(&temp_path, path)?;
                Ok(value)
            }
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                Err(err)
            }
        }
    }
}

/// Hidden sibling used for atomic writes.
fn temp_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(".{stem}.tmp"))
}
