// src/lib.rs

//! Alchemist: recipe derivation search
//!
//! Finds derivation trees that reduce a crafting-game element to the base
//! elements, given an in-memory database of recipes.
//!
//! # Architecture
//!
//! - Store: immutable element -> (tier, ingredient pairs) map, shared by `Arc`
//! - Tier gate: an ingredient must have a strictly lower tier than its product
//! - Strategies: breadth-first, depth-first and bidirectional, one dispatcher
//! - Fan-out: per-element worker pools with quota-driven cancellation
//! - Memo: per-search cache of resolved subtrees
//!
//! ```no_run
//! use alchemist::{RecipeStore, SearchRequest, Searcher, Strategy};
//! use std::sync::Arc;
//!
//! # fn main() -> alchemist::Result<()> {
//! let store = RecipeStore::from_json_file("recipes.json".as_ref())?;
//! let searcher = Searcher::with_defaults(Arc::new(store));
//! let result = searcher.search(&SearchRequest::new("brick", 3).strategy(Strategy::DepthFirst));
//! println!("{} trees, {} nodes", result.trees.len(), result.node_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod search;
pub mod store;
pub mod tree;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use search::{Frontier, SearchRequest, SearchResult, SearchStats, Searcher, Strategy};
pub use store::{ElementInfo, IngredientPair, RecipeStore, Tier};
pub use tree::DerivationNode;
