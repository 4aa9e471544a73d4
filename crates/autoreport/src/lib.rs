//! autoreport: configuration-driven summary reports for CSV data.
//!
//! A report configuration names data columns and how to summarize each one:
//! label counts with percentages, searches for specific values, hierarchical
//! root values, token tallies, duplicate detection, averages or cleaned list
//! values. The result is a headerless three-column CSV of titled sections.
//! An optional insights stage measures associations between chosen columns.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the input table is never modified
//! - **Forgiving configuration**: malformed directives fall back to defaults
//! - **Atomic output**: a report file is either complete or absent
//!
//! # Example
//!
//! ```no_run
//! use autoreport::AutoReport;
//!
//! let summary = AutoReport::new()
//!     .run("data.csv", "report_config.csv", "Analytics_Report.csv")
//!     .unwrap();
//!
//! println!("Sections: {}", summary.sections);
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod insights;
pub mod report;

mod output;
mod pipeline;

pub use config::{ConfigRow, InsightsDirectives, ReportConfig};
pub use error::{ReportError, Result};
pub use input::{DataTable, LoaderConfig, Preamble, SourceMetadata, TableLoader};
pub use insights::{InsightsEngine, InsightsSummary};
pub use pipeline::{AutoReport, LoadedConfig, ReportOptions, RunSummary};
pub use report::{ColumnReportEngine, Report, Section, SectionRow};
