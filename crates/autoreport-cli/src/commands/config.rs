//! Config command - show a resolved report configuration.

use std::path::PathBuf;

use autoreport::AutoReport;
use colored::Colorize;

pub fn run(
    file: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AutoReport::new().load_config(&file)?;
    let config = &loaded.config;

    if json_output {
        let resolved = serde_json::json!({
            "file": loaded.source.file,
            "table_rows": config.table_rows,
            "rows": config.rows,
            "insights": config.insights,
            "input": loaded.preamble.input(),
            "output": loaded.preamble.output(),
        });
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Report configuration".cyan().bold(),
        loaded.source.file.white()
    );
    if verbose {
        println!("  Hash: {}", loaded.source.hash);
    }
    println!();

    if let Some(input) = loaded.preamble.input() {
        println!("  Input:  {}", input.display());
    }
    if let Some(output) = loaded.preamble.output() {
        println!("  Output: {}", output.display());
    }

    println!(
        "{} ({} rows in table)",
        "Columns:".yellow().bold(),
        config.table_rows
    );
    for (column, rows) in config.column_groups() {
        println!("  {}", column.to_uppercase().white().bold());
        for row in rows {
            let mut flags = Vec::new();
            if row.has_value() {
                flags.push(format!("value={}", row.value));
            }
            for (set, name) in [
                (row.aggregate, "aggregate"),
                (row.root_only, "root_only"),
                (row.separate_nodes, "separate_nodes"),
                (row.duplicate, "duplicate"),
                (row.average, "average"),
                (row.clean, "clean"),
            ] {
                if set {
                    flags.push(name.to_string());
                }
            }
            if row.root_only || row.separate_nodes {
                flags.push(format!("delimiter={:?}", row.delimiter));
            }
            let line = if flags.is_empty() {
                "(counts)".to_string()
            } else {
                flags.join(", ")
            };
            println!("    {}", line.dimmed());
        }
    }
    println!();

    let insights = &config.insights;
    let state = if insights.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!("{} {}", "Insights:".yellow().bold(), state);
    println!("  Threshold: {}", insights.threshold);
    println!("  Sources:   {}", insights.sources.join(" | "));
    println!("  Targets:   {}", insights.targets.join(" | "));

    Ok(())
}
