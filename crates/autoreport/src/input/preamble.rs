//! Key/value rows that precede a configuration header.

use std::path::{Path, PathBuf};

/// Rows found above the `COLUMN` header of a report configuration.
///
/// Only `INPUT` and `OUTPUT` keys are interpreted; relative paths are resolved
/// against the directory holding the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preamble {
    entries: Vec<(String, String)>,
    base_dir: Option<PathBuf>,
}

impl Preamble {
    /// Build a preamble from raw records.
    pub fn from_records(records: &[Vec<String>]) -> Self {
        let entries = records
            .iter()
            .filter_map(|record| {
                let key = record.first()?.trim().to_lowercase();
                if key.is_empty() {
                    return None;
                }
                let value = record.get(1).map(|v| v.trim().to_string()).unwrap_or_default();
                Some((key, value))
            })
            .collect();
        Self {
            entries,
            base_dir: None,
        }
    }

    /// Set the directory relative paths resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Raw value of the last entry with this key and a non-empty value.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .rfind(|(k, v)| *k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Resolved `INPUT` path.
    pub fn input(&self) -> Option<PathBuf> {
        self.get("input").map(|p| self.resolve(p))
    }

    /// Resolved `OUTPUT` path.
    pub fn output(&self) -> Option<PathBuf> {
        self.get("output").map(|p| self.resolve(p))
    }

    /// Number of preamble rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration had no preamble.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        let Some(base) = self.base_dir.as_deref() else {
            return path.to_path_buf();
        };
        if path.is_absolute() {
            return path.to_path_buf();
        }

        // A config living in csv_files/ that references csv_files/... would
        // otherwise resolve to csv_files/csv_files/...
        let mut relative = path.to_path_buf();
        let base_is_csv_files = base.file_name().is_some_and(|n| n == "csv_files");
        let mut components = path.components();
        if base_is_csv_files
            && components
                .next()
                .is_some_and(|c| c.as_os_str() == "csv_files")
        {
            relative = components.as_path().to_path_buf();
            if relative.as_os_str().is_empty() {
                relative = PathBuf::from(".");
            }
        }
        base.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_reads_input_and_output() {
        let preamble = Preamble::from_records(&records(&[
            &["INPUT", " data.csv "],
            &["Output", "report.csv"],
        ]))
        .with_base_dir("/srv/reports");

        assert_eq!(preamble.input(), Some(PathBuf::from("/srv/reports/data.csv")));
        assert_eq!(preamble.output(), Some(PathBuf::from("/srv/reports/report.csv")));
    }

    #[test]
    fn test_blank_value_ignored() {
        let preamble = Preamble::from_records(&records(&[&["input", ""], &["input", "b.csv"]]));
        assert_eq!(preamble.input(), Some(PathBuf::from("b.csv")));
        assert_eq!(preamble.output(), None);

        let preamble = Preamble::from_records(&records(&[&["input", "b.csv"], &["input", " "]]));
        assert_eq!(preamble.input(), Some(PathBuf::from("b.csv")));
    }

    #[test]
    fn test_last_entry_wins() {
        let preamble = Preamble::from_records(&records(&[
            &["INPUT", "a.csv"],
            &["output", "first.csv"],
            &["Input", "b.csv"],
            &["OUTPUT", "second.csv"],
        ]));
        assert_eq!(preamble.input(), Some(PathBuf::from("b.csv")));
        assert_eq!(preamble.output(), Some(PathBuf::from("second.csv")));
    }

    #[test]
    fn test_csv_files_segment_not_doubled() {
        let preamble = Preamble::from_records(&records(&[&["input", "csv_files/places.csv"]]))
            .with_base_dir("/work/csv_files");
        assert_eq!(preamble.input(), Some(PathBuf::from("/work/csv_files/places.csv")));
    }

    #[test]
    fn test_absolute_path_kept() {
        let preamble = Preamble::from_records(&records(&[&["output", "/tmp/out.csv"]]))
            .with_base_dir("/work");
        assert_eq!(preamble.output(), Some(PathBuf::from("/tmp/out.csv")));
    }
}
