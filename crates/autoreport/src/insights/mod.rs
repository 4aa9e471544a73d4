//! Optional insights stage: associations between chosen source and target
//! columns, written as correlation and crosstab CSVs.

mod engine;
pub mod stats;

pub use engine::{
    Correlation, Crosstab, InsightsAnalysis, InsightsEngine, InsightsSummary, Method,
    CORRELATION_FILE, CROSSTAB_FILE, DEFAULT_MAX_CATEGORIES,
};
