//! Pairwise association analysis between source and target columns.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::stats::{cramers_v, max_dummy_correlation, pearson};
use crate::config::InsightsDirectives;
use crate::error::{ReportError, Result};
use crate::input::DataTable;
use crate::output::write_records_atomic;

/// File name of the correlation results.
pub const CORRELATION_FILE: &str = "correlation_results.csv";

/// File name of the crosstab blocks.
pub const CROSSTAB_FILE: &str = "crosstabs_output.csv";

/// Distinct-value limit under which any column also counts as categorical.
pub const DEFAULT_MAX_CATEGORIES: usize = 20;

const CORRELATION_HEADER: [&str; 3] = ["Source Column", "Target Column", "Correlation"];

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Statistic used for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Numeric against numeric.
    Pearson,
    /// Categorical against categorical, bias corrected.
    CramersV,
    /// Max absolute Pearson r of one-hot categories against a numeric column.
    DummyPearson,
}

/// A pair whose association passed the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub source: String,
    pub target: String,
    /// Rounded to 4 decimals.
    pub value: f64,
    pub method: Method,
}

/// Counts of paired values for two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crosstab {
    pub source: String,
    pub target: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[row][col]`.
    pub counts: Vec<Vec<usize>>,
}

impl Crosstab {
    /// Tabulate `(source, target)` pairs. Labels are sorted, numerically
    /// when every label is a number.
    pub fn build(source: &str, target: &str, pairs: &[(&str, &str)]) -> Self {
        let row_labels = sorted_labels(pairs.iter().map(|(s, _)| *s));
        let col_labels = sorted_labels(pairs.iter().map(|(_, t)| *t));

        let row_pos: HashMap<&str, usize> = row_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        let col_pos: HashMap<&str, usize> = col_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut counts = vec![vec![0usize; col_labels.len()]; row_labels.len()];
        for (s, t) in pairs {
            counts[row_pos[s]][col_pos[t]] += 1;
        }

        Self {
            source: source.to_string(),
            target: target.to_string(),
            row_labels,
            col_labels,
            counts,
        }
    }

    /// Counts flattened row-major, for the contingency statistics.
    pub fn flat(&self) -> Vec<f64> {
        self.counts
            .iter()
            .flat_map(|row| row.iter().map(|&c| c as f64))
            .collect()
    }

    /// CSV records: title, header, one row per source label, then a blank row.
    pub fn records(&self) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.row_labels.len() + 3);
        records.push(vec![format!(
            "=== Crosstab: {} vs {} ===",
            self.source, self.target
        )]);

        let mut header = vec![self.source.clone()];
        header.extend(self.col_labels.iter().cloned());
        records.push(header);

        for (label, row) in self.row_labels.iter().zip(&self.counts) {
            let mut record = vec![label.clone()];
            record.extend(row.iter().map(usize::to_string));
            records.push(record);
        }

        records.push(Vec::new());
        records
    }
}

/// Everything the analysis found, before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightsAnalysis {
    /// Sorted by value, descending.
    pub correlations: Vec<Correlation>,
    pub crosstabs: Vec<Crosstab>,
}

/// Outcome of a completed insights run.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsSummary {
    pub correlations: Vec<Correlation>,
    pub crosstab_count: usize,
    pub correlation_path: PathBuf,
    pub crosstab_path: PathBuf,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Compares every source column against every target column.
#[derive(Debug, Clone)]
pub struct InsightsEngine {
    max_categories: usize,
}

impl InsightsEngine {
    pub fn new() -> Self {
        Self {
            max_categories: DEFAULT_MAX_CATEGORIES,
        }
    }

    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    /// Analyze all source × target pairs.
    ///
    /// Returns `None` when either side resolves to no data column.
    pub fn analyze(
        &self,
        data: &DataTable,
        directives: &InsightsDirectives,
    ) -> Option<InsightsAnalysis> {
        let sources = resolve_columns(data, &directives.sources);
        let targets = resolve_columns(data, &directives.targets);
        if sources.is_empty() || targets.is_empty() {
            warn!(
                sources = sources.len(),
                targets = targets.len(),
                "insights skipped: no usable source or target columns"
            );
            return None;
        }

        let mut analysis = InsightsAnalysis::default();
        for &source in &sources {
            for &target in &targets {
                self.compare(data, source, target, directives.threshold, &mut analysis);
            }
        }

        analysis
            .correlations
            .sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        Some(analysis)
    }

    /// Analyze, then write both result files into `out_dir`.
    pub fn run(
        &self,
        data: &DataTable,
        directives: &InsightsDirectives,
        out_dir: &Path,
    ) -> Result<Option<InsightsSummary>> {
        if !out_dir.is_dir() {
            return Err(ReportError::Insights(format!(
                "output directory '{}' does not exist",
                out_dir.display()
            )));
        }
        let Some(analysis) = self.analyze(data, directives) else {
            return Ok(None);
        };

        let crosstab_path = out_dir.join(CROSSTAB_FILE);
        write_records_atomic(
            &crosstab_path,
            analysis.crosstabs.iter().flat_map(Crosstab::records),
        )?;
        info!(path = %crosstab_path.display(), crosstabs = analysis.crosstabs.len(), "crosstabs written");

        let correlation_path = out_dir.join(CORRELATION_FILE);
        let mut records = vec![CORRELATION_HEADER.map(str::to_string).to_vec()];
        records.extend(analysis.correlations.iter().map(|c| {
            vec![c.source.clone(), c.target.clone(), c.value.to_string()]
        }));
        write_records_atomic(&correlation_path, records)?;

        if analysis.correlations.is_empty() {
            warn!("no associations reached the insights threshold");
        } else {
            info!(path = %correlation_path.display(), correlations = analysis.correlations.len(), "correlations written");
        }

        Ok(Some(InsightsSummary {
            crosstab_count: analysis.crosstabs.len(),
            correlations: analysis.correlations,
            correlation_path,
            crosstab_path,
        }))
    }

    fn compare(
        &self,
        data: &DataTable,
        source: usize,
        target: usize,
        threshold: f64,
        analysis: &mut InsightsAnalysis,
    ) {
        let source_name = &data.headers[source];
        let target_name = &data.headers[target];

        let pairs: Vec<(&str, &str)> = data
            .rows
            .iter()
            .filter_map(|row| match (&row[source], &row[target]) {
                (Some(s), Some(t)) => Some((s.as_str(), t.as_str())),
                _ => None,
            })
            .collect();
        debug!(source = %source_name, target = %target_name, rows = pairs.len(), "comparing columns");

        let source_numeric = is_numeric_column(data, source);
        let target_numeric = is_numeric_column(data, target);
        let source_categorical =
            !source_numeric || distinct(pairs.iter().map(|(s, _)| *s)) <= self.max_categories;
        let target_categorical =
            !target_numeric || distinct(pairs.iter().map(|(_, t)| *t)) <= self.max_categories;

        let crosstab = (source_categorical && target_categorical)
            .then(|| Crosstab::build(source_name, target_name, &pairs));

        let measured = if source_numeric && target_numeric {
            let xs = numbers(pairs.iter().map(|(s, _)| *s));
            let ys = numbers(pairs.iter().map(|(_, t)| *t));
            pearson(&xs, &ys).map(|r| (r, r.abs(), Method::Pearson))
        } else if let Some(table) = &crosstab {
            cramers_v(&table.flat(), table.row_labels.len(), table.col_labels.len())
                .map(|v| (v, v, Method::CramersV))
        } else {
            let (categories, values): (Vec<&str>, Vec<&str>) = if source_numeric {
                pairs.iter().map(|&(s, t)| (t, s)).unzip()
            } else {
                pairs.iter().copied().unzip()
            };
            max_dummy_correlation(&categories, &numbers(values.into_iter()))
                .map(|m| (m, m, Method::DummyPearson))
        };

        if let Some(table) = crosstab {
            analysis.crosstabs.push(table);
        }

        match measured {
            Some((value, strength, method)) if strength >= threshold => {
                analysis.correlations.push(Correlation {
                    source: source_name.clone(),
                    target: target_name.clone(),
                    value: round4(value),
                    method,
                });
            }
            Some(_) => {}
            None => {
                debug!(source = %source_name, target = %target_name, "association undefined, pair skipped")
            }
        }
    }
}

impl Default for InsightsEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn resolve_columns(data: &DataTable, names: &[String]) -> Vec<usize> {
    let mut resolved = IndexSet::new();
    for name in names {
        match data.resolve_column(name) {
            Some(idx) => {
                resolved.insert(idx);
            }
            None => warn!(column = %name, "insights column not found in data"),
        }
    }
    resolved.into_iter().collect()
}

/// A column is numeric when every non-null cell parses as a number.
fn is_numeric_column(data: &DataTable, index: usize) -> bool {
    data.column_values(index)
        .flatten()
        .all(|v| v.parse::<f64>().is_ok())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<IndexSet<_>>().len()
}

fn numbers<'a>(values: impl Iterator<Item = &'a str>) -> Vec<f64> {
    values.filter_map(|v| v.parse().ok()).collect()
}

fn sorted_labels<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut labels: Vec<String> = values
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let parsed: Option<Vec<f64>> = labels.iter().map(|l| l.parse().ok()).collect();
    match parsed {
        Some(_) => labels.sort_by(|a, b| {
            let a: f64 = a.parse().unwrap_or(f64::NAN);
            let b: f64 = b.parse().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }),
        None => labels.sort(),
    }
    labels
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
