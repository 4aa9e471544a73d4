//! CSV loader with header normalization and configuration-header detection.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::preamble::Preamble;
use super::source::{normalize_cell, normalize_name, DataTable, SourceMetadata};
use crate::error::{ReportError, Result};

/// Header cell that marks the start of a report configuration.
const CONFIG_HEADER: &str = "column";

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            max_rows: None,
        }
    }
}

/// Loads data and configuration tables from CSV files.
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a data file. The first record is the header.
    pub fn load_data(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, size_bytes) = read_file(path)?;
        let table = self.parse_data_bytes(&contents)?;
        let source = self.source_metadata(path, &contents, size_bytes, &table);
        Ok((table, source))
    }

    /// Load a report configuration file.
    ///
    /// The header is the first line unless that line lacks a `column` cell, in
    /// which case the first record starting with `column` is used and the
    /// records above it are returned as the [`Preamble`].
    pub fn load_config(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(DataTable, Preamble, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, size_bytes) = read_file(path)?;
        let (table, mut preamble) = self.parse_config_bytes(&contents)?;

        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if let Some(dir) = absolute.parent() {
            preamble = preamble.with_base_dir(dir);
        }

        let source = self.source_metadata(path, &contents, size_bytes, &table);
        Ok((table, preamble, source))
    }

    /// Parse data bytes directly.
    pub fn parse_data_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let records = self.read_records(bytes)?;
        let (header, rows) = records
            .split_first()
            .ok_or_else(|| ReportError::EmptyData("No header row found".to_string()))?;
        Ok(self.build_table(header, rows))
    }

    /// Parse configuration bytes directly.
    pub fn parse_config_bytes(&self, bytes: &[u8]) -> Result<(DataTable, Preamble)> {
        let records = self.read_records(bytes)?;
        if records.is_empty() {
            return Err(ReportError::EmptyData("Configuration file is empty".to_string()));
        }

        let first_has_column = records[0]
            .iter()
            .any(|cell| normalize_name(cell) == CONFIG_HEADER);
        let header_idx = if first_has_column {
            0
        } else {
            records
                .iter()
                .position(|record| {
                    record
                        .first()
                        .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(CONFIG_HEADER))
                })
                .unwrap_or(0)
        };
        if header_idx > 0 {
            debug!(header_row = header_idx, "configuration header found below preamble");
        }

        let preamble = Preamble::from_records(&records[..header_idx]);
        let mut table = self.build_table(&records[header_idx], &records[header_idx + 1..]);

        if let Some(col) = table.column_index(CONFIG_HEADER) {
            for row in &mut table.rows {
                if let Some(cell) = row[col].take() {
                    row[col] = normalize_cell(&normalize_name(&cell));
                }
            }
        }

        Ok((table, preamble))
    }

    /// Read every record as raw strings; the header is not treated specially.
    fn read_records(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(records)
    }

    /// Turn a header record and data records into a normalized table.
    fn build_table(&self, header: &[String], records: &[Vec<String>]) -> DataTable {
        let headers: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let name = normalize_name(h);
                if name.is_empty() {
                    format!("unnamed_{}", i)
                } else {
                    name
                }
            })
            .collect();
        let headers = make_unique(headers);

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows = records
            .iter()
            .take(limit)
            .map(|record| record.iter().map(|cell| normalize_cell(cell)).collect())
            .collect();

        DataTable::new(headers, rows)
    }

    fn source_metadata(
        &self,
        path: &Path,
        contents: &[u8],
        size_bytes: u64,
        table: &DataTable,
    ) -> SourceMetadata {
        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let format = match self.config.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        )
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<(Vec<u8>, u64)> {
    let mut file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    let size_bytes = file
        .metadata()
        .map_err(|e| ReportError::io(path, e))?
        .len();
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| ReportError::io(path, e))?;
    Ok((contents, size_bytes))
}

/// Disambiguate repeated names with `.1`, `.2`, ... suffixes.
///
/// Generated names never collide with a name that appears anywhere in the input.
pub fn make_unique(names: Vec<String>) -> Vec<String> {
    let reserved: HashSet<String> = names.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if used.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let counter = counters.entry(name.clone()).or_insert(0);
        let candidate = loop {
            *counter += 1;
            let candidate = format!("{}.{}", name, counter);
            if !reserved.contains(&candidate) && !used.contains(&candidate) {
                break candidate;
            }
        };
        debug!(column = %name, renamed = %candidate, "duplicate column name");
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}
