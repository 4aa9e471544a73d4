//! Report configuration: typed column directives and insights settings.

mod directives;
mod row;

pub use directives::{
    InsightsDirectives, DEFAULT_THRESHOLD, DIRECTIVE_KEYS, INSIGHTS_ENABLED, INSIGHTS_SOURCES,
    INSIGHTS_TARGETS, INSIGHTS_THRESHOLD,
};
pub use row::{ConfigRow, ReportConfig, DEFAULT_DELIMITER};
