//! Report assembly and output.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::section::{Section, SectionRow};
use crate::error::Result;
use crate::output::{write_records, write_records_atomic};

/// Ordered sections produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find a section by its title label (e.g. `"STATUS"`).
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title().label == title)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Flatten into output rows, a blank row after each section.
    pub fn to_rows(&self) -> Vec<SectionRow> {
        assemble(&self.sections)
    }

    /// Render the report as headerless CSV text.
    pub fn to_csv_string(&self) -> Result<String> {
        let rows = self.to_rows();
        let bytes = write_records(Vec::new(), rows.iter().map(SectionRow::cells))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the report to `path`; see [`write_report`].
    pub fn write(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        write_report(&self.to_rows(), path)
    }
}

/// Concatenate sections, inserting one blank row after each.
pub fn assemble(sections: &[Section]) -> Vec<SectionRow> {
    let mut rows = Vec::with_capacity(sections.iter().map(|s| s.len() + 1).sum());
    for section in sections {
        rows.extend(section.rows().iter().cloned());
        rows.push(SectionRow::blank());
    }
    rows
}

/// Write assembled rows as headerless CSV and return the destination path.
pub fn write_report(rows: &[SectionRow], path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    write_records_atomic(path, rows.iter().map(SectionRow::cells))?;
    info!(path = %path.display(), rows = rows.len(), "report written");
    Ok(path.to_path_buf())
}
