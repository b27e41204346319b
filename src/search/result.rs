// src/search/result.rs

//! Search results and their assembly
//!
//! Every search ends here, found or not: the collected trees are packaged
//! together with the node count, wall-clock duration and counters gathered
//! along the way.

use super::Strategy;
use crate::tree::{total_nodes, DerivationNode};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Resolution steps taken (one per element expansion attempt)
    pub visited: usize,
    /// Memo lookups that found an entry
    pub cache_hits: usize,
    /// Memo lookups that found nothing
    pub cache_misses: usize,
    /// Fan-out worker threads started
    pub workers_spawned: usize,
}

/// Thread-safe visit counter handed down the call tree
#[derive(Debug, Default)]
pub struct VisitCounter(AtomicUsize);

impl VisitCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one resolution step
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one search
///
/// An empty `trees` list means no tier-respecting derivation exists (or
/// the quota was 0); it is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(rename = "targetElement")]
    pub target: String,
    pub strategy: Strategy,
    /// Trees in discovery order
    #[serde(rename = "tree")]
    pub trees: Vec<Arc<DerivationNode>>,
    /// Nodes across all trees, shared subtrees counted per occurrence
    #[serde(rename = "nodes")]
    pub node_count: usize,
    #[serde(rename = "time", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchResult {
    /// Check whether at least one derivation was found
    pub fn is_found(&self) -> bool {
        !self.trees.is_empty()
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}

/// Package collected trees into a [`SearchResult`]
pub fn assemble(
    target: &str,
    strategy: Strategy,
    trees: Vec<Arc<DerivationNode>>,
    started: Instant,
    stats: SearchStats,
) -> SearchResult {
    let node_count = total_nodes(&trees);
    let elapsed = started.elapsed();

    info!(
        "{} search for '{}' found {} trees ({} nodes) in {:?}",
        strategy,
        target,
        trees.len(),
        node_count,
        elapsed
    );

    SearchResult {
        target: target.to_string(),
        strategy,
        trees,
        node_count,
        elapsed,
        stats,
    }
}
