// src/commands/search.rs

//! `alchemist search`: run one derivation search and emit JSON

use super::{load_config, load_store, normalize_element};
use alchemist::{SearchRequest, Searcher, Strategy};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Options for a single search invocation
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub target: String,
    pub recipes: PathBuf,
    pub strategy: Strategy,
    pub quota: usize,
    pub max_depth: Option<usize>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

/// Search for derivations of an element and write the result as JSON
pub fn cmd_search(opts: SearchOptions) -> Result<()> {
    let config = load_config(opts.config.as_deref())?;
    let store = load_store(&opts.recipes, &config)?;

    let target = normalize_element(&opts.target);
    if !store.contains(&target) {
        info!("'{}' is not in the recipe database", target);
    }

    let mut request = SearchRequest::new(target, opts.quota).strategy(opts.strategy);
    if let Some(depth) = opts.max_depth {
        request = request.max_depth(depth);
    }

    let searcher = Searcher::new(Arc::new(store), config);
    let result = searcher.search(&request);

    let json = if opts.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("Failed to serialize search result")?;

    match &opts.output {
        Some(path) => write_output(path, &json)?,
        None => println!("{}", json),
    }

    if !result.is_found() {
        eprintln!("No derivation found for '{}'", result.target);
    }
    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write result to {}", path.display()))?;
    info!("Wrote search result to {}", path.display());
    Ok(())
}
