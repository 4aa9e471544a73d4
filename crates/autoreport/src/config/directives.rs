//! Insights settings carried as pseudo-rows of the configuration table.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const INSIGHTS_ENABLED: &str = "insights_enabled";
pub const INSIGHTS_THRESHOLD: &str = "insights_threshold";
pub const INSIGHTS_SOURCES: &str = "insights_sources";
pub const INSIGHTS_TARGETS: &str = "insights_targets";

/// `column` values that carry directives instead of naming a data column.
pub const DIRECTIVE_KEYS: &[&str] = &[
    INSIGHTS_ENABLED,
    INSIGHTS_THRESHOLD,
    INSIGHTS_SOURCES,
    INSIGHTS_TARGETS,
];

/// Default minimum association strength kept in the results.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Settings for the insights stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsDirectives {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Minimum association strength kept in the results.
    pub threshold: f64,
    /// Candidate source column names, as written.
    pub sources: Vec<String>,
    /// Candidate target column names, as written.
    pub targets: Vec<String>,
}

impl Default for InsightsDirectives {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl InsightsDirectives {
    /// Apply one directive row. Unrecognized payloads keep the current setting.
    pub fn apply(&mut self, key: &str, payload: Option<&str>) {
        let payload = payload.map(str::trim).unwrap_or_default();
        match key {
            INSIGHTS_ENABLED => match payload.to_lowercase().as_str() {
                "yes" | "true" => self.enabled = true,
                "no" | "false" => self.enabled = false,
                "" => {}
                other => warn!(value = other, "ignoring unrecognized insights_enabled value"),
            },
            INSIGHTS_THRESHOLD => match payload.parse::<f64>() {
                Ok(threshold) if threshold.is_finite() => self.threshold = threshold,
                _ if payload.is_empty() => {}
                _ => warn!(value = payload, "ignoring unparseable insights_threshold"),
            },
            INSIGHTS_SOURCES => self.sources = split_list(payload),
            INSIGHTS_TARGETS => self.targets = split_list(payload),
            _ => {}
        }
    }

    /// Whether both sides of the comparison name at least one column.
    pub fn has_columns(&self) -> bool {
        !self.sources.is_empty() && !self.targets.is_empty()
    }
}

fn split_list(payload: &str) -> Vec<String> {
    payload
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let d = InsightsDirectives::default();
        assert!(d.enabled);
        assert_eq!(d.threshold, 0.2);
        assert!(!d.has_columns());
    }

    #[test]
    fn test_enabled_values() {
        let mut d = InsightsDirectives::default();
        d.apply(INSIGHTS_ENABLED, Some("No"));
        assert!(!d.enabled);
        d.apply(INSIGHTS_ENABLED, Some("maybe"));
        assert!(!d.enabled);
        d.apply(INSIGHTS_ENABLED, Some(" TRUE "));
        assert!(d.enabled);
    }

    #[test]
    fn test_threshold_fallback() {
        let mut d = InsightsDirectives::default();
        d.apply(INSIGHTS_THRESHOLD, Some("abc"));
        assert_eq!(d.threshold, 0.2);
        d.apply(INSIGHTS_THRESHOLD, Some("0.35"));
        assert_eq!(d.threshold, 0.35);
        d.apply(INSIGHTS_THRESHOLD, None);
        assert_eq!(d.threshold, 0.35);
    }

    #[test]
    fn test_lists() {
        let mut d = InsightsDirectives::default();
        d.apply(INSIGHTS_SOURCES, Some("a | b||c "));
        d.apply(INSIGHTS_TARGETS, Some("d"));
        assert_eq!(d.sources, vec!["a", "b", "c"]);
        assert_eq!(d.targets, vec!["d"]);
        assert!(d.has_columns());
    }
}
