// src/search/memo.rs

//! Per-search memoization of resolved subtrees
//!
//! Elements such as "water" or "mud" show up under many recipes. Once one
//! branch has resolved an element, sibling branches reuse the same
//! `Arc`-shared subtrees instead of rebuilding them.
//!
//! A cache lives for exactly one top-level search. Entries are truncated to
//! that search's quota, so they are not a complete answer for a search with
//! a larger quota and must never be shared between calls.
//!
//! # Depth budgets
//!
//! A depth-bounded resolution that had a branch cut by the bound only holds
//! the trees that fit its remaining depth. Such an entry records that budget
//! and only answers lookups with the same or less depth left. Entries built
//! without any cut are exact and answer every lookup.

use crate::tree::DerivationNode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolved derivations of one element
#[derive(Debug, Clone)]
pub struct MemoEntry {
    pub trees: Arc<Vec<Arc<DerivationNode>>>,
    /// Height of the tallest tree in `trees`
    pub height: usize,
    /// Remaining depth the entry was built with, `None` if nothing was cut
    pub budget: Option<usize>,
}

impl MemoEntry {
    /// Wrap a list of trees, recording their maximum height
    pub fn new(trees: Vec<Arc<DerivationNode>>) -> Self {
        let height = trees.iter().map(|tree| tree.height()).max().unwrap_or(0);
        Self {
            trees: Arc::new(trees),
            height,
            budget: None,
        }
    }

    /// Wrap trees resolved with only `budget` levels of depth left
    pub fn within(trees: Vec<Arc<DerivationNode>>, budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::new(trees)
        }
    }

    /// Check whether this entry holds every tree that fits in `budget` levels
    pub fn covers(&self, budget: usize) -> bool {
        self.budget.is_none_or(|built| budget <= built)
    }
}

/// Concurrency-safe element -> subtrees map
#[derive(Debug, Default)]
pub struct MemoCache {
    entries: RwLock<HashMap<String, MemoEntry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl MemoCache {
    /// Create a cache with every base element pre-seeded as a single leaf
    pub fn seeded<'a>(base: impl IntoIterator<Item = &'a str>) -> Self {
        let cache = Self::default();
        {
            let mut entries = cache.entries.write();
            for name in base {
                let leaf = Arc::new(DerivationNode::leaf(name));
                entries.insert(name.to_string(), MemoEntry::new(vec![leaf]));
            }
        }
        cache
    }

    /// Look up an element, counting the hit or miss
    pub fn get(&self, element: &str) -> Option<MemoEntry> {
        let entry = self.entries.read().get(element).cloned();
        let counter = if entry.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        entry
    }

    /// Store the resolved subtrees of an element, replacing any earlier entry
    pub fn put(&self, element: &str, trees: Vec<Arc<DerivationNode>>) -> MemoEntry {
        let entry = MemoEntry::new(trees);
        self.entries
            .write()
            .insert(element.to_string(), entry.clone());
        entry
    }

    /// Store subtrees resolved under a depth budget
    ///
    /// An existing entry built with at least as much depth is kept, since it
    /// holds a superset of what fits in `budget`.
    pub fn put_within(
        &self,
        element: &str,
        trees: Vec<Arc<DerivationNode>>,
        budget: usize,
    ) -> MemoEntry {
        let entry = MemoEntry::within(trees, budget);
        let mut entries = self.entries.write();
        if !entries.get(element).is_some_and(|existing| existing.covers(budget)) {
            entries.insert(element.to_string(), entry.clone());
        }
        entry
    }

    /// Number of cached elements
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Lookups that found an entry
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}
