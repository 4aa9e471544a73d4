//! Column report engine: turns configuration rows into report sections.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::assembler::Report;
use super::section::{Section, SectionRow};
use super::values::{clean_list_string, contains_segment, format_percent, root_value, split_values};
use crate::config::{ConfigRow, ReportConfig};
use crate::input::DataTable;

/// Digits, optional decimal part, optional trailing percent sign.
static AVERAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d*(\.\d+)?%?$").unwrap());

/// The algorithm applied to a configured column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMode {
    /// Emit every value with list syntax collapsed.
    Clean,
    /// List values that occur more than once.
    Duplicate,
    /// Mean of a numeric (or percentage) column.
    Average,
    /// Label counts with percentages.
    Counts,
}

impl ColumnMode {
    /// Pick the mode for a column. A mode flag on any of the column's rows
    /// applies to the whole column; clean beats duplicate beats average.
    pub fn select(rows: &[&ConfigRow]) -> Self {
        if rows.iter().any(|r| r.clean) {
            ColumnMode::Clean
        } else if rows.iter().any(|r| r.duplicate) {
            ColumnMode::Duplicate
        } else if rows.iter().any(|r| r.average) {
            ColumnMode::Average
        } else {
            ColumnMode::Counts
        }
    }
}

/// Engine that builds the report sections for a data table.
pub struct ColumnReportEngine;

impl ColumnReportEngine {
    /// Create a new report engine.
    pub fn new() -> Self {
        Self
    }

    /// Build the full report: a `Total rows` section, then one section per
    /// configured column that exists in `data`.
    pub fn generate(&self, data: &DataTable, config: &ReportConfig) -> Report {
        let mut report = Report::new();
        report.push(Section::titled(
            "Total rows",
            "",
            config.table_rows.to_string(),
        ));

        for (column, rows) in config.column_groups() {
            let Some(index) = data.resolve_column(column) else {
                debug!(column = %column, "configured column not found in data, skipping");
                continue;
            };
            let values: Vec<Option<&str>> = data.column_values(index).collect();
            report.push(self.column_section(column, &rows, &values));
        }

        report
    }

    /// Build the section for one column from its configuration rows and values.
    pub fn column_section(
        &self,
        column: &str,
        rows: &[&ConfigRow],
        values: &[Option<&str>],
    ) -> Section {
        let title = column.to_uppercase();
        match ColumnMode::select(rows) {
            ColumnMode::Clean => clean_section(&title, values),
            ColumnMode::Duplicate => duplicate_section(&title, values),
            ColumnMode::Average => average_section(&title, values),
            ColumnMode::Counts => counts_section(&title, rows, values),
        }
    }
}

impl Default for ColumnReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_section(title: &str, values: &[Option<&str>]) -> Section {
    let mut section = Section::titled(title, "", "Cleaned");
    // Cleaned text lives only in the section; the table keeps its raw values.
    for value in values {
        section.push(SectionRow::new(
            "",
            "",
            clean_list_string(value.unwrap_or_default()),
        ));
    }
    section
}

fn duplicate_section(title: &str, values: &[Option<&str>]) -> Section {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values.iter().flatten() {
        *counts.entry(*value).or_insert(0) += 1;
    }

    let mut section = Section::titled(title, "Duplicates", "Instances");
    for (value, count) in counts {
        if count > 1 {
            section.push(SectionRow::new("", value, count.to_string()));
        }
    }
    section
}

fn average_section(title: &str, values: &[Option<&str>]) -> Section {
    let mut section = Section::titled(title, "", "Average");
    let present: Vec<&str> = values.iter().flatten().copied().collect();

    if !present.iter().all(|v| AVERAGE_PATTERN.is_match(v)) {
        section.push(SectionRow::new("Non-digit field", "", ""));
        return section;
    }

    let numbers: Vec<f64> = present
        .iter()
        .filter_map(|&v| v.strip_suffix('%').unwrap_or(v).parse::<f64>().ok())
        .collect();
    let unit = if present.iter().any(|v| v.ends_with('%')) { "%" } else { "" };

    let formatted = if numbers.is_empty() {
        "N/A".to_string()
    } else {
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        format!("{:.2}{}", mean, unit)
    };
    section.push(SectionRow::new("", "", formatted));
    section
}

fn counts_section(title: &str, rows: &[&ConfigRow], values: &[Option<&str>]) -> Section {
    let total_rows = values.len();
    let mut section = Section::titled(title, "%", "Count");
    for (label, count) in label_counts(rows, values) {
        section.push(SectionRow::new(
            label,
            format_percent(count, total_rows),
            count.to_string(),
        ));
    }
    section
}

/// Count labels for a column in the default mode.
///
/// When any row names a `value`, only those rows run, each counting its own
/// value (search mode). Otherwise every row contributes: separate-nodes rows
/// tally tokens, aggregate rows tally distinct values, and bare rows count
/// values with an empty segment under `None`.
pub fn label_counts(rows: &[&ConfigRow], values: &[Option<&str>]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    let searches: Vec<&ConfigRow> = rows.iter().copied().filter(|r| r.has_value()).collect();
    if !searches.is_empty() {
        for row in searches {
            let prepared = prepare_values(row, values);
            let count = if row.separate_nodes {
                tokens(row, &prepared)
                    .iter()
                    .filter(|token| clean_list_string(token) == row.value)
                    .count()
            } else {
                prepared
                    .iter()
                    .filter(|v| contains_segment(v, &row.value))
                    .count()
            };
            counts.insert(row.label().to_string(), count);
        }
        return counts;
    }

    for row in rows {
        let prepared = prepare_values(row, values);
        if row.separate_nodes {
            for token in tokens(row, &prepared) {
                *counts.entry(token).or_insert(0) += 1;
            }
        } else if row.aggregate {
            let mut tally: BTreeMap<String, usize> = BTreeMap::new();
            for value in &prepared {
                let key = value.trim().to_lowercase();
                if !key.is_empty() {
                    *tally.entry(key).or_insert(0) += 1;
                }
            }
            counts.extend(tally);
        } else {
            let count = prepared
                .iter()
                .filter(|v| contains_segment(v, &row.value))
                .count();
            *counts.entry(row.label().to_string()).or_insert(0) += count;
        }
    }

    counts
}

/// Values as text (nulls become empty), reduced to their root when asked.
fn prepare_values(row: &ConfigRow, values: &[Option<&str>]) -> Vec<String> {
    values
        .iter()
        .map(|v| {
            let v = v.unwrap_or_default();
            if row.root_only {
                root_value(v, &row.delimiter)
            } else {
                v.to_string()
            }
        })
        .collect()
}

/// Lowercased non-empty tokens from every value, in row order.
fn tokens(row: &ConfigRow, prepared: &[String]) -> Vec<String> {
    prepared
        .iter()
        .flat_map(|v| split_values(v, &row.delimiter))
        .map(|token| token.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(column: &str, values: &[Option<&str>]) -> DataTable {
        DataTable::new(
            vec![column.to_string()],
            values.iter().map(|v| vec![v.map(str::to_string)]).collect(),
        )
    }

    fn rows_of(section: &Section) -> Vec<[String; 3]> {
        section
            .rows()
            .iter()
            .map(|r| [r.label.clone(), r.annotation.clone(), r.value.clone()])
            .collect()
    }

    fn row(a: &str, b: &str, c: &str) -> [String; 3] {
        [a.to_string(), b.to_string(), c.to_string()]
    }

    fn run(data: &DataTable, rows: Vec<ConfigRow>) -> Report {
        ColumnReportEngine::new().generate(data, &ReportConfig::from_rows(rows))
    }

    #[test]
    fn test_aggregate_alphabetical_with_null_in_denominator() {
        let data = table("status", &[Some("open"), Some("open"), Some("closed"), None]);
        let report = run(&data, vec![ConfigRow::new("status").aggregate()]);

        assert_eq!(
            rows_of(report.section("STATUS").unwrap()),
            vec![
                row("STATUS", "%", "Count"),
                row("closed", "25.00%", "1"),
                row("open", "50.00%", "2"),
            ]
        );
    }

    #[test]
    fn test_total_rows_counts_config_rows() {
        let data = table("status", &[Some("open")]);
        let mut config = ReportConfig::from_rows(vec![ConfigRow::new("status").aggregate()]);
        config.table_rows = 7;
        let report = ColumnReportEngine::new().generate(&data, &config);
        assert_eq!(
            rows_of(&report.sections()[0]),
            vec![row("Total rows", "", "7")]
        );
    }

    #[test]
    fn test_separate_nodes_tally() {
        let data = table("tags", &[Some("a|b"), Some("a")]);
        let rows = [ConfigRow::new("tags").separate_nodes().with_delimiter("|")];
        let refs: Vec<&ConfigRow> = rows.iter().collect();
        let values: Vec<Option<&str>> = data.column_values(0).collect();

        let counts = label_counts(&refs, &values);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["b"], 1);

        let report = run(&data, rows.to_vec());
        assert_eq!(
            rows_of(report.section("TAGS").unwrap()),
            vec![
                row("TAGS", "%", "Count"),
                row("a", "100.00%", "2"),
                row("b", "50.00%", "1"),
            ]
        );
    }

    #[test]
    fn test_separate_nodes_literal_delimiter() {
        let data = table("path", &[Some("A.B"), Some("a . c"), Some("..")]);
        let report = run(
            &data,
            vec![ConfigRow::new("path").separate_nodes().with_delimiter(".")],
        );
        assert_eq!(
            rows_of(report.section("PATH").unwrap()),
            vec![
                row("PATH", "%", "Count"),
                row("a", "66.67%", "2"),
                row("b", "33.33%", "1"),
                row("c", "33.33%", "1"),
            ]
        );
    }

    #[test]
    fn test_average_with_percent() {
        let data = table("score", &[Some("10"), Some("20"), Some("30%")]);
        let report = run(&data, vec![ConfigRow::new("score").average()]);
        assert_eq!(
            rows_of(report.section("SCORE").unwrap()),
            vec![row("SCORE", "", "Average"), row("", "", "20.00%")]
        );
    }

    #[test]
    fn test_average_ignores_nulls() {
        let data = table("n", &[Some("1.5"), None, Some("2")]);
        let report = run(&data, vec![ConfigRow::new("n").average()]);
        assert_eq!(report.section("N").unwrap().body()[0].value, "1.75");
    }

    #[test]
    fn test_average_non_digit() {
        let data = table("score", &[Some("10"), Some("abc")]);
        let report = run(&data, vec![ConfigRow::new("score").average()]);
        assert_eq!(
            rows_of(report.section("SCORE").unwrap()),
            vec![
                row("SCORE", "", "Average"),
                row("Non-digit field", "", "")
            ]
        );
    }

    #[test]
    fn test_average_negative_is_non_digit() {
        let data = table("score", &[Some("-1"), Some("2")]);
        let report = run(&data, vec![ConfigRow::new("score").average()]);
        assert_eq!(report.section("SCORE").unwrap().body()[0].label, "Non-digit field");
    }

    #[test]
    fn test_missing_column_skipped() {
        let data = table("status", &[Some("open")]);
        let report = run(&data, vec![ConfigRow::new("nope").aggregate()]);
        assert_eq!(report.len(), 1);
        assert_eq!(report.sections()[0].title().label, "Total rows");
    }

    #[test]
    fn test_search_values_segment_match() {
        let data = table(
            "country",
            &[Some("USA"), Some("uk | usa"), Some("France"), Some("usa-east"), None],
        );
        let report = run(
            &data,
            vec![
                ConfigRow::new("country").with_value("usa"),
                ConfigRow::new("country").with_value("uk"),
            ],
        );
        assert_eq!(
            rows_of(report.section("COUNTRY").unwrap()),
            vec![
                row("COUNTRY", "%", "Count"),
                row("usa", "40.00%", "2"),
                row("uk", "20.00%", "1"),
            ]
        );
    }

    #[test]
    fn test_search_ignores_rows_without_value() {
        let data = table("country", &[Some("usa"), Some("uk")]);
        let report = run(
            &data,
            vec![
                ConfigRow::new("country").aggregate(),
                ConfigRow::new("country").with_value("uk"),
            ],
        );
        let section = report.section("COUNTRY").unwrap();
        assert_eq!(section.body().len(), 1);
        assert_eq!(section.body()[0].label, "uk");
    }

    #[test]
    fn test_search_with_separate_nodes_cleans_tokens() {
        let data = table("vendors", &[Some("['Square'; 'Toast']"), Some("square")]);
        let report = run(
            &data,
            vec![
                ConfigRow::new("vendors")
                    .separate_nodes()
                    .with_delimiter(";")
                    .with_value("square"),
            ],
        );
        assert_eq!(report.section("VENDORS").unwrap().body()[0].value, "2");
    }

    #[test]
    fn test_search_match_always_uses_bar() {
        let data = table("tags", &[Some("a;b"), Some("a|b")]);
        let report = run(
            &data,
            vec![ConfigRow::new("tags").with_delimiter(";").with_value("b")],
        );
        assert_eq!(report.section("TAGS").unwrap().body()[0].value, "1");
    }

    #[test]
    fn test_root_only_aggregate() {
        let data = table(
            "category",
            &[Some("Food > Cafe"), Some("food > Bakery"), Some("Retail")],
        );
        let report = run(
            &data,
            vec![ConfigRow::new("category").aggregate().root_only().with_delimiter(">")],
        );
        assert_eq!(
            rows_of(report.section("CATEGORY").unwrap()),
            vec![
                row("CATEGORY", "%", "Count"),
                row("food", "66.67%", "2"),
                row("retail", "33.33%", "1"),
            ]
        );
    }

    #[test]
    fn test_root_only_search() {
        let data = table("category", &[Some("Cafe|Food"), Some("Food|Cafe")]);
        let report = run(
            &data,
            vec![ConfigRow::new("category").root_only().with_value("cafe")],
        );
        assert_eq!(report.section("CATEGORY").unwrap().body()[0].value, "1");
    }

    #[test]
    fn test_bare_mode_counts_blank_values_as_none() {
        let data = table("notes", &[Some("x"), None, Some("a||b"), None]);
        let report = run(&data, vec![ConfigRow::new("notes")]);
        assert_eq!(
            rows_of(report.section("NOTES").unwrap()),
            vec![row("NOTES", "%", "Count"), row("None", "75.00%", "3")]
        );
    }

    #[test]
    fn test_bare_rows_accumulate() {
        let data = table("notes", &[None, Some("x")]);
        let report = run(&data, vec![ConfigRow::new("notes"), ConfigRow::new("notes")]);
        assert_eq!(report.section("NOTES").unwrap().body()[0].value, "2");
    }

    #[test]
    fn test_duplicates_in_first_appearance_order() {
        let data = table(
            "place_id",
            &[Some("b"), Some("a"), Some("b"), Some("A"), Some("a"), None, None, Some("b")],
        );
        let report = run(&data, vec![ConfigRow::new("place_id").duplicate()]);
        assert_eq!(
            rows_of(report.section("PLACE_ID").unwrap()),
            vec![
                row("PLACE_ID", "Duplicates", "Instances"),
                row("", "b", "3"),
                row("", "a", "2"),
            ]
        );
    }

    #[test]
    fn test_clean_section() {
        let data = table("vendors", &[Some("['A', 'B']"), Some("foo[1]"), None]);
        let report = run(&data, vec![ConfigRow::new("vendors").clean()]);
        assert_eq!(
            rows_of(report.section("VENDORS").unwrap()),
            vec![
                row("VENDORS", "", "Cleaned"),
                row("", "", "A, B"),
                row("", "", "foo1"),
                row("", "", ""),
            ]
        );
    }

    #[test]
    fn test_clean_does_not_touch_table() {
        let data = table("vendors", &[Some("['A', 'B']")]);
        let before = data.clone();
        run(&data, vec![ConfigRow::new("vendors").clean()]);
        assert_eq!(data, before);
    }

    #[test]
    fn test_mode_priority() {
        let data = table("x", &[Some("1"), Some("1")]);
        let report = run(
            &data,
            vec![
                ConfigRow::new("x").duplicate(),
                ConfigRow::new("x").clean(),
                ConfigRow::new("x").average(),
            ],
        );
        assert_eq!(report.section("X").unwrap().title().value, "Cleaned");

        let report = run(
            &data,
            vec![ConfigRow::new("x").average(), ConfigRow::new("x").duplicate()],
        );
        assert_eq!(report.section("X").unwrap().title().annotation, "Duplicates");
    }

    #[test]
    fn test_sections_follow_config_order() {
        let data = DataTable::from_strings(&["a", "b"], &[vec!["1", "2"]]);
        let report = run(
            &data,
            vec![
                ConfigRow::new("b").aggregate(),
                ConfigRow::new("a").aggregate(),
                ConfigRow::new("b").aggregate(),
            ],
        );
        let titles: Vec<&str> = report
            .sections()
            .iter()
            .map(|s| s.title().label.as_str())
            .collect();
        assert_eq!(titles, vec!["Total rows", "B", "A"]);
    }

    #[test]
    fn test_empty_table_percentages() {
        let data = table("status", &[]);
        let report = run(&data, vec![ConfigRow::new("status")]);
        assert_eq!(
            rows_of(report.section("STATUS").unwrap()),
            vec![row("STATUS", "%", "Count"), row("None", "0.00%", "0")]
        );
    }
}
