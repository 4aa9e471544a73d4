//! Report sections: titled blocks of three-cell rows.

use serde::{Deserialize, Serialize};

/// One output row: `[label, percent or annotation, count or value]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRow {
    pub label: String,
    pub annotation: String,
    pub value: String,
}

impl SectionRow {
    pub fn new(
        label: impl Into<String>,
        annotation: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            annotation: annotation.into(),
            value: value.into(),
        }
    }

    /// The separator row placed after every section.
    pub fn blank() -> Self {
        Self::new("", "", "")
    }

    pub fn cells(&self) -> [&str; 3] {
        [&self.label, &self.annotation, &self.value]
    }

    pub fn is_blank(&self) -> bool {
        self.cells().iter().all(|c| c.is_empty())
    }
}

/// A titled block of rows for one configured column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    rows: Vec<SectionRow>,
}

impl Section {
    /// Start a section with its title row.
    pub fn titled(
        label: impl Into<String>,
        annotation: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            rows: vec![SectionRow::new(label, annotation, value)],
        }
    }

    pub fn push(&mut self, row: SectionRow) {
        self.rows.push(row);
    }

    /// The title row.
    pub fn title(&self) -> &SectionRow {
        &self.rows[0]
    }

    /// Rows after the title.
    pub fn body(&self) -> &[SectionRow] {
        &self.rows[1..]
    }

    pub fn rows(&self) -> &[SectionRow] {
        &self.rows
    }

    /// Number of rows, title included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the section has nothing beyond its title.
    pub fn is_empty(&self) -> bool {
        self.rows.len() <= 1
    }
}
