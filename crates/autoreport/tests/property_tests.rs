//! Property-based tests for the report engine.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: configuration parsing never crashes on any input
//! 2. **Invariants**: percentages and counts stay consistent with the data
//! 3. **Stability**: cleaning an already cleaned value changes nothing
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p autoreport --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p autoreport --test property_tests
//! ```

use proptest::prelude::*;

use autoreport::report::values::{clean_list_string, parse_flag};
use autoreport::{ColumnReportEngine, ConfigRow, DataTable, ReportConfig};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary flag cells, including the accepted spellings.
fn flag_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("yes".to_string()),
        Just("TRUE".to_string()),
        Just(" Yes ".to_string()),
        Just("no".to_string()),
        "[a-zA-Z0-9 ]{0,8}",
    ]
}

/// Lists of plain words rendered as a Python-style list literal.
fn word_list() -> impl Strategy<Value = (Vec<String>, String)> {
    prop::collection::vec("[A-Za-z]{1,8}", 1..6).prop_map(|words| {
        let quoted: Vec<String> = words.iter().map(|w| format!("'{}'", w)).collect();
        let literal = format!("[{}]", quoted.join(", "));
        (words, literal)
    })
}

/// A single column of optional category values.
fn category_column() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(
        prop::option::of(prop_oneof![
            Just("open".to_string()),
            Just("Closed".to_string()),
            Just("pending".to_string()),
            "[a-z]{1,6}",
        ]),
        0..40,
    )
}

fn table(values: &[Option<String>]) -> DataTable {
    DataTable::new(
        vec!["status".to_string()],
        values.iter().map(|v| vec![v.clone()]).collect(),
    )
}

// =============================================================================
// Configuration
// =============================================================================

proptest! {
    #[test]
    fn prop_unknown_flags_never_enable(cell in flag_cell()) {
        let expected = matches!(cell.trim().to_lowercase().as_str(), "yes" | "true");
        prop_assert_eq!(parse_flag(Some(&cell)), expected);
    }

    #[test]
    fn prop_config_table_never_panics(
        cells in prop::collection::vec(prop::collection::vec(flag_cell(), 9), 0..10)
    ) {
        let headers = [
            "column", "value", "aggregate", "root_only", "delimiter",
            "separate_nodes", "duplicate", "average", "clean",
        ];
        let table = DataTable::from_strings(&headers, &cells);
        let config = ReportConfig::from_table(&table);
        prop_assert_eq!(config.table_rows, cells.len());
        prop_assert!(config.rows.len() <= cells.len());
    }
}

// =============================================================================
// Clean
// =============================================================================

proptest! {
    #[test]
    fn prop_clean_joins_list_items((words, literal) in word_list()) {
        prop_assert_eq!(clean_list_string(&literal), words.join(", "));
    }

    #[test]
    fn prop_clean_is_idempotent((_, literal) in word_list()) {
        let once = clean_list_string(&literal);
        prop_assert_eq!(clean_list_string(&once), once);
    }
}

// =============================================================================
// Aggregate counts
// =============================================================================

proptest! {
    #[test]
    fn prop_aggregate_counts_non_null_values(values in category_column()) {
        let data = table(&values);
        let config = ReportConfig::from_rows(vec![ConfigRow::new("status").aggregate()]);
        let report = ColumnReportEngine::new().generate(&data, &config);
        let section = report.section("STATUS").unwrap();

        let total: usize = section
            .body()
            .iter()
            .map(|row| row.value.parse::<usize>().unwrap())
            .sum();
        let non_null = values.iter().flatten().count();
        prop_assert_eq!(total, non_null);

        for row in section.body() {
            let count: f64 = row.value.parse().unwrap();
            let expected = format!("{:.2}%", count / values.len() as f64 * 100.0);
            prop_assert_eq!(&row.annotation, &expected);
        }
    }

    #[test]
    fn prop_aggregate_labels_sorted(values in category_column()) {
        let data = table(&values);
        let config = ReportConfig::from_rows(vec![ConfigRow::new("status").aggregate()]);
        let report = ColumnReportEngine::new().generate(&data, &config);
        let labels: Vec<&str> = report
            .section("STATUS")
            .unwrap()
            .body()
            .iter()
            .map(|row| row.label.as_str())
            .collect();
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(labels, sorted);
    }
}
