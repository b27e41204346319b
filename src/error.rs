// src/error.rs

//! Error types for recipe loading and configuration
//!
//! The search engine itself never fails: missing derivations, unbuildable
//! ingredients and exhausted quotas all show up in the returned
//! [`SearchResult`](crate::SearchResult). Errors only arise at the boundary,
//! when a recipe database or config file is read and validated.

use thiserror::Error;

/// Errors raised while building a recipe store or loading configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read a recipe database or config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Recipe database is not valid JSON or has the wrong shape
    #[error("Failed to parse recipe database: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file is not valid TOML or has the wrong shape
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A recipe that is not exactly an ordered pair of ingredients
    #[error("Malformed recipe for '{element}': expected 2 ingredients, found {arity}")]
    MalformedRecipe { element: String, arity: usize },

    /// A base element declared with a non-zero tier
    #[error("Invalid tier {tier} for base element '{element}': base elements are tier 0")]
    InvalidTier { element: String, tier: u32 },

    /// Config values that cannot drive a search
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible library operations
pub type Result<T> = std::result::Result<T, Error>;
