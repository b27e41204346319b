// src/cli/mod.rs
//! CLI definitions for alchemist
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `search` - Find derivation trees for an element
//! - `inspect` - Show an element's tier and recipes against the tier gate
//! - `validate` - Load a recipe database and summarize it

use alchemist::Strategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alchemist")]
#[command(version)]
#[command(about = "Find tier-respecting derivation trees in a recipe database", long_about = None)]
pub struct Cli {
    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find derivation trees that build an element from base elements
    Search {
        /// Element to derive
        target: String,

        /// Path to the recipe database (JSON)
        #[arg(short, long)]
        recipes: PathBuf,

        /// Traversal strategy: bfs, dfs or bidirectional
        #[arg(short, long, default_value = "bfs")]
        strategy: Strategy,

        /// Maximum number of trees to return
        #[arg(short, long, default_value_t = 1)]
        quota: usize,

        /// Depth bound for dfs (overrides the config file)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Search tunables (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Show an element's recipes and whether each passes the tier gate
    Inspect {
        /// Element to inspect
        element: String,

        /// Path to the recipe database (JSON)
        #[arg(short, long)]
        recipes: PathBuf,

        /// Search tunables (TOML), for a non-default base set
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load a recipe database and report its shape
    Validate {
        /// Path to the recipe database (JSON)
        #[arg(short, long)]
        recipes: PathBuf,

        /// Search tunables (TOML), checked as well when given
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "alchemist", "search", "brick", "--recipes", "r.json", "--strategy", "dfs", "-q", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Search {
                target,
                strategy,
                quota,
                max_depth,
                ..
            } => {
                assert_eq!(target, "brick");
                assert_eq!(strategy, Strategy::DepthFirst);
                assert_eq!(quota, 3);
                assert_eq!(max_depth, None);
            }
            _ => panic!("expected search"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let parsed = Cli::try_parse_from([
            "alchemist", "search", "brick", "--recipes", "r.json", "--strategy", "astar",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_verbose() {
        let cli =
            Cli::try_parse_from(["alchemist", "validate", "--recipes", "r.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
