// src/search/mod.rs

//! Derivation search engine
//!
//! Given a recipe store, a target element and a quota, find up to `quota`
//! derivation trees that reduce the target to base elements.
//!
//! # Strategies
//!
//! All three share the tier gate in [`gate`] and the node model in
//! [`crate::tree`]:
//!
//! - [`Strategy::BreadthFirst`]: single-threaded, queue-driven, yields trees
//!   in a reproducible shortest-first order.
//! - [`Strategy::DepthFirst`]: recursive descent with a path visited-set and
//!   a depth bound, fanning out over candidate pairs concurrently.
//! - [`Strategy::Bidirectional`]: a frontier grown upward from the base
//!   elements prunes unreachable elements in O(1) while the target is
//!   resolved top-down with the same concurrent fan-out.
//!
//! # Per-search state
//!
//! Each [`Searcher::search`] call builds a fresh memo cache, cancellation
//! root, worker budget and visit counter. Only the store and the
//! bidirectional frontier (derived purely from the store) outlive a call.

mod bfs;
mod bidirectional;
mod dfs;
pub mod fanout;
pub mod gate;
pub mod memo;
mod result;

pub use bidirectional::Frontier;
pub use result::{assemble, SearchResult, SearchStats, VisitCounter};

use crate::config::SearchConfig;
use crate::store::RecipeStore;
use fanout::{CancelToken, FanOut, WorkerBudget};
use memo::MemoCache;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{info, warn};

/// Traversal strategy for a search
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Strategy {
    /// Queue-driven, deterministic, shortest-first
    #[default]
    #[serde(rename = "bfs")]
    #[strum(to_string = "bfs", serialize = "breadth-first")]
    BreadthFirst,
    /// Bounded recursive descent with concurrent fan-out
    #[serde(rename = "dfs")]
    #[strum(to_string = "dfs", serialize = "depth-first")]
    DepthFirst,
    /// Base-element frontier plus top-down resolution
    #[serde(rename = "bidirectional")]
    #[strum(to_string = "bidirectional", serialize = "bidi")]
    Bidirectional,
}

impl Strategy {
    /// Whether results may arrive in a different order between runs
    pub fn is_concurrent(self) -> bool {
        !matches!(self, Strategy::BreadthFirst)
    }
}

/// Parameters of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub target: String,
    /// Maximum number of trees to return; 0 requests none
    pub quota: usize,
    pub strategy: Strategy,
    /// Depth-first bound, overriding the configured default
    pub max_depth: Option<usize>,
}

impl SearchRequest {
    /// Breadth-first request for `quota` trees of `target`
    pub fn new(target: impl Into<String>, quota: usize) -> Self {
        Self {
            target: target.into(),
            quota,
            strategy: Strategy::default(),
            max_depth: None,
        }
    }

    /// Use a different strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Override the depth-first bound
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// State owned by a single search call
pub(crate) struct SearchContext<'s> {
    pub store: &'s RecipeStore,
    pub config: &'s SearchConfig,
    pub quota: usize,
    pub memo: MemoCache,
    pub budget: WorkerBudget,
    pub visits: VisitCounter,
    pub cancel: CancelToken,
}

impl<'s> SearchContext<'s> {
    fn new(store: &'s RecipeStore, config: &'s SearchConfig, quota: usize) -> Self {
        Self {
            store,
            config,
            quota,
            memo: MemoCache::seeded(store.base_elements()),
            budget: WorkerBudget::new(config.max_total_workers),
            visits: VisitCounter::new(),
            cancel: CancelToken::new(),
        }
    }

    pub fn fanout(&self) -> FanOut<'_> {
        FanOut::new(&self.budget)
    }

    /// Fan-out pool size for an element
    pub fn pool_size(&self, element: &str) -> usize {
        self.config
            .workers_for_tier(self.store.tier_of(element).unwrap_or(0))
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            visited: self.visits.get(),
            cache_hits: self.memo.hits(),
            cache_misses: self.memo.misses(),
            workers_spawned: self.budget.spawned(),
        }
    }
}

fn base_sets_match(store: &RecipeStore, config: &SearchConfig) -> bool {
    let configured: BTreeSet<&str> = config.base_elements.iter().map(String::as_str).collect();
    configured.into_iter().eq(store.base_elements())
}

/// Search engine over one immutable recipe store
#[derive(Debug)]
pub struct Searcher {
    store: Arc<RecipeStore>,
    config: SearchConfig,
    frontier: OnceLock<Frontier>,
}

impl Searcher {
    /// Create a searcher with the given tunables
    ///
    /// The base set is fixed when the store is built, so the store's base
    /// elements are the ones every search uses. `config.base_elements` only
    /// matters when loading a store with it; a mismatch is logged.
    pub fn new(store: Arc<RecipeStore>, config: SearchConfig) -> Self {
        if !base_sets_match(&store, &config) {
            warn!(
                "Config base elements [{}] differ from the store's [{}]; using the store's",
                config.base_elements.join(", "),
                store.base_elements().join(", ")
            );
        }
        Self {
            store,
            config,
            frontier: OnceLock::new(),
        }
    }

    /// Create a searcher with default tunables
    pub fn with_defaults(store: Arc<RecipeStore>) -> Self {
        Self::new(store, SearchConfig::default())
    }

    /// The store this searcher reads
    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// The tunables in effect
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Base-reachability frontier, computed on first use
    pub fn frontier(&self) -> &Frontier {
        self.frontier.get_or_init(|| Frontier::build(&self.store))
    }

    /// Run one search
    ///
    /// Never fails: an unknown, unbuildable or unreachable target, or a
    /// quota of 0, yields a result with no trees.
    pub fn search(&self, request: &SearchRequest) -> SearchResult {
        let started = Instant::now();
        let target = request.target.as_str();

        info!(
            "Searching for '{}' with {} (quota {})",
            target, request.strategy, request.quota
        );

        let ctx = SearchContext::new(&self.store, &self.config, request.quota);
        if request.quota == 0 {
            return assemble(target, request.strategy, Vec::new(), started, ctx.stats());
        }

        let trees = match request.strategy {
            Strategy::BreadthFirst => bfs::search(&ctx, target),
            Strategy::DepthFirst => {
                let max_depth = request.max_depth.unwrap_or(self.config.max_depth);
                dfs::search(&ctx, target, max_depth)
            }
            Strategy::Bidirectional => bidirectional::search(&ctx, self.frontier(), target),
        };

        assemble(target, request.strategy, trees, started, ctx.stats())
    }
}
