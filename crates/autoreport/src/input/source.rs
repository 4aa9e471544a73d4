//! Loaded table representation and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a loaded CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Format implied by the delimiter (csv, tsv, ...).
    pub format: String,
    /// Assumed encoding.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Tabular data with normalized headers and nullable, trimmed cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Normalized, unique column names.
    pub headers: Vec<String>,
    /// Row data (row-major order). `None` is a blank cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl DataTable {
    /// Create a new data table. Rows are padded or truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from string cells, applying the loader's cell rules
    /// (trim, blank becomes null) and header normalization.
    pub fn from_strings<H, C>(headers: &[H], rows: &[Vec<C>]) -> Self
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        let headers = headers.iter().map(|h| normalize_name(h.as_ref())).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| normalize_cell(c.as_ref())).collect())
            .collect();
        Self::new(headers, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Exact lookup of an already-normalized column name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve a user-authored column name against the headers.
    ///
    /// The name is normalized the way headers are; if that does not match,
    /// names are compared ignoring punctuation and whitespace.
    pub fn resolve_column(&self, name: &str) -> Option<usize> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        if let Some(index) = self.column_index(&normalized) {
            return Some(index);
        }
        let key = lookup_key(&normalized);
        if key.is_empty() {
            return None;
        }
        self.headers.iter().position(|h| lookup_key(h) == key)
    }

    /// Get a column by (user-authored) name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.resolve_column(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

/// Normalize a header or column reference: trim, lowercase, spaces to underscores.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Trim a raw cell; blank cells become `None`.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::from_strings(
            &["Place ID", "Country", "Modern Category"],
            &[vec!["1", " USA ", ""], vec!["2", "UK", "cafe"]],
        )
    }

    #[test]
    fn test_headers_normalized() {
        let t = table();
        assert_eq!(t.headers, vec!["place_id", "country", "modern_category"]);
    }

    #[test]
    fn test_cells_trimmed_and_nulled() {
        let t = table();
        assert_eq!(t.get(0, 1), Some("USA"));
        assert_eq!(t.get(0, 2), None);
        assert_eq!(t.get(1, 2), Some("cafe"));
    }

    #[test]
    fn test_resolve_column() {
        let t = table();
        assert_eq!(t.resolve_column("country"), Some(1));
        assert_eq!(t.resolve_column("  Modern Category "), Some(2));
        assert_eq!(t.resolve_column("place-id"), Some(0));
        assert_eq!(t.resolve_column("missing"), None);
        assert_eq!(t.resolve_column(""), None);
    }

    #[test]
    fn test_short_rows_padded() {
        let t = DataTable::from_strings(&["a", "b"], &[vec!["1"]]);
        assert_eq!(t.rows[0], vec![Some("1".to_string()), None]);
    }
}
