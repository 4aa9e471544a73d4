//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// autoreport: configuration-driven summary reports for CSV data
#[derive(Parser)]
#[command(name = "autoreport")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a report from a data file and a report configuration
    Run {
        /// Path to the report configuration CSV
        #[arg(
            long,
            env = "AUTOREPORT_CONFIG",
            default_value = "csv_files/report_config.csv"
        )]
        config_path: PathBuf,

        /// Path to the data CSV (overridden by the configuration's INPUT row)
        #[arg(long)]
        input_path: Option<PathBuf>,

        /// Path of the report to write (overridden by the configuration's OUTPUT row)
        #[arg(long)]
        output_path: Option<PathBuf>,

        /// Ignore INPUT/OUTPUT rows in the configuration
        #[arg(long)]
        no_config_io: bool,

        /// Skip the insights stage
        #[arg(long)]
        no_insights: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a report configuration is resolved
    Config {
        /// Path to the report configuration CSV
        #[arg(value_name = "CONFIG")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
