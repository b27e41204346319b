// src/store/loader.rs

//! JSON recipe database loading
//!
//! The database is a single object keyed by element name:
//!
//! ```json
//! {
//!   "mud":   { "tier": 1, "recipes": [["water", "earth"]] },
//!   "brick": { "tier": 2, "recipes": [["mud", "fire"]] }
//! }
//! ```
//!
//! Recipe order inside each element is preserved; it is the tie-break order
//! every search strategy uses.

use super::{ElementInfo, IngredientPair, RecipeStore, RecipeStoreBuilder, Tier};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// One element as it appears in the JSON database
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub tier: Tier,
    #[serde(default)]
    pub recipes: Vec<Vec<String>>,
}

impl RawElement {
    fn into_info(self, element: &str) -> Result<ElementInfo> {
        let recipes = self
            .recipes
            .into_iter()
            .map(|recipe| match <[String; 2]>::try_from(recipe) {
                Ok([a, b]) => Ok(IngredientPair(a, b)),
                Err(recipe) => Err(Error::MalformedRecipe {
                    element: element.to_string(),
                    arity: recipe.len(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ElementInfo {
            tier: self.tier,
            recipes,
        })
    }
}

impl RecipeStoreBuilder {
    /// Add every element of a parsed JSON database
    pub fn raw_elements(mut self, raw: BTreeMap<String, RawElement>) -> Result<Self> {
        for (name, element) in raw {
            let info = element.into_info(&name)?;
            self.insert(name, info);
        }
        Ok(self)
    }
}

impl RecipeStore {
    /// Parse a JSON database using the default base set
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_json_str_with_base(content, crate::config::DEFAULT_BASE_ELEMENTS)
    }

    /// Parse a JSON database with a custom base set
    pub fn from_json_str_with_base<I, S>(content: &str, base: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: BTreeMap<String, RawElement> = serde_json::from_str(content)?;
        debug!("Parsed recipe database with {} elements", raw.len());

        RecipeStore::builder()
            .base_elements(base)
            .raw_elements(raw)?
            .build()
    }

    /// Read and parse a JSON database file using the default base set
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json_file_with_base(path, crate::config::DEFAULT_BASE_ELEMENTS)
    }

    /// Read and parse a JSON database file with a custom base set
    pub fn from_json_file_with_base<I, S>(path: &Path, base: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str_with_base(&content, base)
    }
}
