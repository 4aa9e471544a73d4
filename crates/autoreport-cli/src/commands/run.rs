//! Run command - generate a report and the optional insights files.

use std::path::PathBuf;

use autoreport::{AutoReport, ReportOptions};
use colored::Colorize;
use tracing::debug;

pub struct RunArgs {
    pub config_path: PathBuf,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub no_config_io: bool,
    pub no_insights: bool,
    pub json: bool,
}

pub fn run(args: RunArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReportOptions {
        insights: !args.no_insights,
        ..ReportOptions::default()
    };
    let report = AutoReport::with_options(options);
    let loaded = report.load_config(&args.config_path)?;

    // Configuration INPUT/OUTPUT rows win over the command line.
    let (input, output) = if args.no_config_io {
        (args.input_path, args.output_path)
    } else {
        (
            loaded.preamble.input().or(args.input_path),
            loaded.preamble.output().or(args.output_path),
        )
    };
    let input = input.ok_or("No input path: pass --input-path or add an INPUT row")?;
    let output = output.ok_or("No output path: pass --output-path or add an OUTPUT row")?;
    debug!(input = %input.display(), output = %output.display(), "resolved report paths");

    if !args.json {
        println!(
            "{} {}",
            "Generating report from".cyan().bold(),
            input.display().to_string().white()
        );
        if verbose {
            println!(
                "  Config: {} ({} column rows)",
                args.config_path.display(),
                loaded.config.rows.len()
            );
        }
    }

    let summary = report.run_loaded(&input, loaded, &output)?;

    if args.json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} ({} sections, {} rows)",
        "Report written to".green().bold(),
        summary.output.display().to_string().white(),
        summary.sections,
        summary.rows
    );

    match &summary.insights {
        Some(insights) => {
            println!(
                "{} {} associations, {} crosstabs",
                "Insights:".yellow().bold(),
                insights.correlations.len(),
                insights.crosstab_count
            );
            if verbose {
                for c in &insights.correlations {
                    println!("  {} vs {}: {}", c.source, c.target, c.value);
                }
            }
            println!("  {}", insights.correlation_path.display());
            println!("  {}", insights.crosstab_path.display());
        }
        None if verbose => println!("{}", "Insights: not run".dimmed()),
        None => {}
    }

    Ok(())
}
