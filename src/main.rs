// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::SearchOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            target,
            recipes,
            strategy,
            quota,
            max_depth,
            config,
            output,
            pretty,
        } => commands::cmd_search(SearchOptions {
            target,
            recipes,
            strategy,
            quota,
            max_depth,
            config,
            output,
            pretty,
        }),
        Commands::Inspect {
            element,
            recipes,
            config,
        } => commands::cmd_inspect(&element, &recipes, config.as_deref()),
        Commands::Validate { recipes, config } => {
            commands::cmd_validate(&recipes, config.as_deref())
        }
    }
}
