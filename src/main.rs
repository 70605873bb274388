//! Lockstage - dependency manifest staging for CI caches
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use lockstage::cli::{Cli, Commands};
use lockstage::config::ConfigManager;
use lockstage::error::LockstageResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Overrides the `-v` derived filter, e.g. `LOCKSTAGE_LOG=lockstage=trace`
const LOG_ENV_VAR: &str = "LOCKSTAGE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LockstageResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // The log format lives in the config, so loading it logs as text
    let config = {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_env_filter(log_filter(cli.verbose))
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .finish(),
        );
        config_manager.load().await?
    };

    // Logs go to stderr so stdout stays parseable (`--format json`)
    let filter = log_filter(cli.verbose);
    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }

    match cli.command {
        Commands::Stage(args) => lockstage::cli::commands::stage(args, &config).await,
        Commands::Config(args) => {
            lockstage::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// 0 = info (staging result), 1 = debug, 2+ = trace
fn log_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("lockstage=info"),
        1 => EnvFilter::new("lockstage=debug"),
        _ => EnvFilter::new("lockstage=trace"),
    })
}
