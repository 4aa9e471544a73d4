//! autoreport CLI - configuration-driven CSV reports.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            config_path,
            input_path,
            output_path,
            no_config_io,
            no_insights,
            json,
        } => commands::run::run(
            commands::run::RunArgs {
                config_path,
                input_path,
                output_path,
                no_config_io,
                no_insights,
                json,
            },
            cli.verbose,
        ),

        Commands::Config { file, json } => commands::config::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
