//! Typed configuration rows resolved from the raw configuration table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::directives::{InsightsDirectives, DIRECTIVE_KEYS};
use crate::input::{normalize_name, DataTable};
use crate::report::values::parse_flag;

/// Delimiter used when the configuration does not name one.
pub const DEFAULT_DELIMITER: &str = "|";

/// One report directive for a data column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRow {
    /// Normalized target column name.
    pub column: String,
    /// Lowercased filter value; empty means no filter.
    pub value: String,
    pub aggregate: bool,
    pub root_only: bool,
    pub delimiter: String,
    pub separate_nodes: bool,
    pub duplicate: bool,
    pub average: bool,
    pub clean: bool,
}

impl ConfigRow {
    /// A row for `column` with every flag off.
    pub fn new(column: impl AsRef<str>) -> Self {
        Self {
            column: normalize_name(column.as_ref()),
            value: String::new(),
            aggregate: false,
            root_only: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
            separate_nodes: false,
            duplicate: false,
            average: false,
            clean: false,
        }
    }

    pub fn with_value(mut self, value: impl AsRef<str>) -> Self {
        self.value = value.as_ref().trim().to_lowercase();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn aggregate(mut self) -> Self {
        self.aggregate = true;
        self
    }

    pub fn root_only(mut self) -> Self {
        self.root_only = true;
        self
    }

    pub fn separate_nodes(mut self) -> Self {
        self.separate_nodes = true;
        self
    }

    pub fn duplicate(mut self) -> Self {
        self.duplicate = true;
        self
    }

    pub fn average(mut self) -> Self {
        self.average = true;
        self
    }

    pub fn clean(mut self) -> Self {
        self.clean = true;
        self
    }

    /// Whether this row filters on a specific value.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Label used for this row's count in bare and search modes.
    pub fn label(&self) -> &str {
        if self.value.is_empty() { "None" } else { &self.value }
    }
}

/// The resolved report configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Column directives in table order.
    pub rows: Vec<ConfigRow>,
    /// Number of rows in the configuration table, directives included.
    pub table_rows: usize,
    /// Settings for the insights stage.
    pub insights: InsightsDirectives,
}

impl ReportConfig {
    /// Build a configuration from already-typed rows.
    pub fn from_rows(rows: Vec<ConfigRow>) -> Self {
        let table_rows = rows.len();
        Self {
            rows,
            table_rows,
            insights: InsightsDirectives::default(),
        }
    }

    /// Resolve a raw configuration table.
    ///
    /// Never fails: missing columns and unrecognized flag values fall back to
    /// defaults, and rows without a `column` are ignored.
    pub fn from_table(table: &DataTable) -> Self {
        let field = |name: &str| table.resolve_column(name);
        let column_idx = field("column");
        let value_idx = field("value");
        let aggregate_idx = field("aggregate");
        let root_only_idx = field("root_only");
        let delimiter_idx = field("delimiter");
        let separate_nodes_idx = field("separate_nodes");
        let duplicate_idx = field("duplicate");
        let average_idx = field("average");
        let clean_idx = field("clean");

        let mut rows = Vec::new();
        let mut insights = InsightsDirectives::default();

        for row_idx in 0..table.row_count() {
            let cell = |idx: Option<usize>| idx.and_then(|c| table.get(row_idx, c));
            let flag = |idx: Option<usize>| parse_flag(cell(idx));

            let column = normalize_name(dequote(cell(column_idx).unwrap_or_default()));
            if column.is_empty() {
                continue;
            }

            if DIRECTIVE_KEYS.contains(&column.as_str()) {
                insights.apply(&column, cell(value_idx));
                continue;
            }

            rows.push(ConfigRow {
                column,
                value: cell(value_idx).unwrap_or_default().trim().to_lowercase(),
                aggregate: flag(aggregate_idx),
                root_only: flag(root_only_idx),
                delimiter: cell(delimiter_idx)
                    .unwrap_or(DEFAULT_DELIMITER)
                    .to_string(),
                separate_nodes: flag(separate_nodes_idx),
                duplicate: flag(duplicate_idx),
                average: flag(average_idx),
                clean: flag(clean_idx),
            });
        }

        Self {
            rows,
            table_rows: table.row_count(),
            insights,
        }
    }

    /// Rows grouped by column, in first-appearance order.
    pub fn column_groups(&self) -> IndexMap<&str, Vec<&ConfigRow>> {
        let mut groups: IndexMap<&str, Vec<&ConfigRow>> = IndexMap::new();
        for row in &self.rows {
            groups.entry(row.column.as_str()).or_default().push(row);
        }
        groups
    }
}

/// Strip surrounding whitespace and one layer of matching quotes.
fn dequote(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}
