// src/commands/mod.rs
//! Command handlers for the alchemist CLI

mod inspect;
mod search;
mod validate;

pub use inspect::cmd_inspect;
pub use search::{SearchOptions, cmd_search};
pub use validate::cmd_validate;

use alchemist::{RecipeStore, SearchConfig};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Load the config file if one was given, defaults otherwise
pub(crate) fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SearchConfig::default()),
    }
}

/// Load a recipe database using the configured base set
pub(crate) fn load_store(path: &Path, config: &SearchConfig) -> Result<RecipeStore> {
    let store = RecipeStore::from_json_file_with_base(path, &config.base_elements)
        .with_context(|| format!("Failed to load recipes from {}", path.display()))?;
    debug!("Loaded {} elements from {}", store.len(), path.display());
    Ok(store)
}

/// Element names in the database are lowercase
pub(crate) fn normalize_element(name: &str) -> String {
    name.trim().to_lowercase()
}
