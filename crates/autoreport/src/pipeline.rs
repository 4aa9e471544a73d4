//! Main `AutoReport` struct and public API.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::input::{DataTable, LoaderConfig, Preamble, SourceMetadata, TableLoader};
use crate::insights::{InsightsEngine, InsightsSummary};
use crate::report::{ColumnReportEngine, Report};

/// Options for a report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Loader configuration shared by the data and configuration files.
    pub loader: LoaderConfig,
    /// Run the insights stage when the configuration enables it.
    pub insights: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            insights: true,
        }
    }
}

/// A configuration file resolved and ready to run.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ReportConfig,
    /// `INPUT` / `OUTPUT` rows found above the header.
    pub preamble: Preamble,
    pub source: SourceMetadata,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Metadata about the data file.
    pub input: SourceMetadata,
    /// Metadata about the configuration file.
    pub config: SourceMetadata,
    /// Where the report was written.
    pub output: PathBuf,
    /// Number of sections, `Total rows` included.
    pub sections: usize,
    /// Number of rows written, separators included.
    pub rows: usize,
    /// Insights outcome, if the stage ran and produced files.
    pub insights: Option<InsightsSummary>,
}

impl RunSummary {
    /// Pretty-printed JSON form of the summary.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Loads tables, builds the report and writes it.
pub struct AutoReport {
    options: ReportOptions,
    loader: TableLoader,
    engine: ColumnReportEngine,
    insights: InsightsEngine,
}

impl AutoReport {
    /// Create a new instance with default options.
    pub fn new() -> Self {
        Self::with_options(ReportOptions::default())
    }

    /// Create an instance with custom options.
    pub fn with_options(options: ReportOptions) -> Self {
        let loader = TableLoader::with_config(options.loader.clone());
        Self {
            options,
            loader,
            engine: ColumnReportEngine::new(),
            insights: InsightsEngine::new(),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Load and resolve a configuration file.
    pub fn load_config(&self, path: impl AsRef<Path>) -> Result<LoadedConfig> {
        let (table, preamble, source) = self.loader.load_config(path)?;
        Ok(LoadedConfig {
            config: ReportConfig::from_table(&table),
            preamble,
            source,
        })
    }

    /// Build the report sections without writing anything.
    pub fn generate(&self, data: &DataTable, config: &ReportConfig) -> Report {
        self.engine.generate(data, config)
    }

    /// Load both files, write the report to `output` and run insights.
    pub fn run(
        &self,
        input: impl AsRef<Path>,
        config: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let loaded = self.load_config(config)?;
        self.run_loaded(input, loaded, output)
    }

    /// Like [`run`](Self::run) with the configuration already loaded.
    pub fn run_loaded(
        &self,
        input: impl AsRef<Path>,
        loaded: LoadedConfig,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let output = output.as_ref();
        let (data, input_source) = self.loader.load_data(input)?;
        info!(
            rows = data.row_count(),
            columns = data.column_count(),
            config_rows = loaded.config.rows.len(),
            "tables loaded"
        );

        let out_dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&out_dir).map_err(|e| ReportError::io(&out_dir, e))?;

        let report = self.generate(&data, &loaded.config);
        let rows = report.to_rows();
        let written = crate::report::write_report(&rows, output)?;

        let insights = if self.options.insights && loaded.config.insights.enabled {
            match self.insights.run(&data, &loaded.config.insights, &out_dir) {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "insights stage failed, report kept");
                    None
                }
            }
        } else {
            None
        };

        Ok(RunSummary {
            input: input_source,
            config: loaded.source,
            output: written,
            sections: report.len(),
            rows: rows.len(),
            insights,
        })
    }
}

impl Default for AutoReport {
    fn default() -> Self {
        Self::new()
    }
}
