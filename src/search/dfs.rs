// src/search/dfs.rs

//! Depth-first bounded search
//!
//! Resolves an element by resolving both ingredients of each candidate pair
//! before the pair's node is complete. Candidate pairs of one element are
//! explored concurrently through the fan-out scheduler, and every ingredient
//! resolution recurses through the same function.
//!
//! Two guards keep degenerate data finite even beyond the tier gate: a
//! visited-set of the elements on the current path, and a depth bound. An
//! element that trips either comes back unresolved, and any pair depending
//! on it is dropped rather than failing the whole search.

use super::SearchContext;
use super::fanout::CancelToken;
use super::gate::candidate_pairs;
use crate::tree::DerivationNode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// What resolving one element produced
///
/// `pruned` records whether the depth bound or the path check cut any branch
/// below this element, in which case more depth could yield more trees.
#[derive(Debug)]
enum Resolution {
    Complete {
        trees: Arc<Vec<Arc<DerivationNode>>>,
        pruned: bool,
    },
    Unresolved { pruned: bool },
}

impl Resolution {
    fn pruned(&self) -> bool {
        match self {
            Resolution::Complete { pruned, .. } | Resolution::Unresolved { pruned } => *pruned,
        }
    }

    fn into_trees(self) -> Option<Arc<Vec<Arc<DerivationNode>>>> {
        match self {
            Resolution::Complete { trees, .. } => Some(trees),
            Resolution::Unresolved { .. } => None,
        }
    }
}

pub(crate) fn search(
    ctx: &SearchContext<'_>,
    target: &str,
    max_depth: usize,
) -> Vec<Arc<DerivationNode>> {
    match resolve(ctx, target, &[], 0, max_depth, &ctx.cancel) {
        Resolution::Complete { trees, .. } => trees.iter().take(ctx.quota).cloned().collect(),
        Resolution::Unresolved { pruned } => {
            debug!(
                "DFS left {} unresolved (max depth {}, pruned: {})",
                target, max_depth, pruned
            );
            Vec::new()
        }
    }
}

fn resolve(
    ctx: &SearchContext<'_>,
    element: &str,
    ancestors: &[&str],
    depth: usize,
    max_depth: usize,
    cancel: &CancelToken,
) -> Resolution {
    ctx.visits.record();
    let budget = max_depth.saturating_sub(depth);

    // Only reuse an entry that fits here and was not cut shorter than here
    if let Some(entry) = ctx.memo.get(element)
        && !entry.trees.is_empty()
        && entry.height <= budget
        && entry.covers(budget)
    {
        return Resolution::Complete {
            pruned: entry.budget.is_some(),
            trees: entry.trees,
        };
    }

    if ancestors.contains(&element) {
        trace!("DFS cycle on {} at depth {}", element, depth);
        return Resolution::Unresolved { pruned: true };
    }
    if depth >= max_depth {
        trace!("DFS depth bound reached at {}", element);
        return Resolution::Unresolved { pruned: true };
    }

    let candidates = candidate_pairs(ctx.store, element, ancestors);
    if candidates.is_empty() {
        return Resolution::Unresolved { pruned: false };
    }

    let mut path = ancestors.to_vec();
    path.push(element);
    let path = path.as_slice();
    let pruned = AtomicBool::new(false);

    let outcome = ctx.fanout().run(
        element,
        ctx.pool_size(element),
        candidates,
        ctx.quota,
        cancel,
        |pair, emitter, token| {
            let mut sides = Vec::with_capacity(2);
            for ingredient in pair.ingredients() {
                let resolution = resolve(ctx, ingredient, path, depth + 1, max_depth, token);
                if resolution.pruned() {
                    pruned.store(true, Ordering::Relaxed);
                }
                match resolution.into_trees() {
                    Some(trees) => sides.push(trees),
                    None => return,
                }
            }
            let (left, right) = (&sides[0], &sides[1]);

            for l in left.iter() {
                for r in right.iter() {
                    let node =
                        DerivationNode::combine(element, pair.clone(), l.clone(), r.clone());
                    if !emitter.emit(Arc::new(node)) {
                        return;
                    }
                }
            }
        },
    );
    let pruned = pruned.into_inner();

    if outcome.items.is_empty() {
        return Resolution::Unresolved { pruned };
    }

    // A pool cut short from above holds an arbitrary subset; keep it out of the cache
    if outcome.interrupted {
        return Resolution::Complete {
            trees: Arc::new(outcome.items),
            pruned,
        };
    }
    let entry = if pruned {
        ctx.memo.put_within(element, outcome.items, budget)
    } else {
        ctx.memo.put(element, outcome.items)
    };
    Resolution::Complete {
        trees: entry.trees,
        pruned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::store::{IngredientPair, RecipeStore};

    fn store() -> RecipeStore {
        RecipeStore::builder()
            .element("mud", 1, [("water", "earth")])
            .element("lava", 1, [("fire", "earth")])
            .element("stone", 2, [("lava", "air"), ("mud", "lava")])
            .element("wall", 3, [("stone", "stone")])
            .element("castle", 4, [("wall", "stone")])
            .build()
            .unwrap()
    }

    fn run(
        store: &RecipeStore,
        target: &str,
        quota: usize,
        max_depth: usize,
    ) -> Vec<Arc<DerivationNode>> {
        let config = SearchConfig::default();
        let ctx = SearchContext::new(store, &config, quota);
        search(&ctx, target, max_depth)
    }

    /// `s` has a short and a tall recipe; `t` reaches `s` at depth 1 and 2
    fn tall_short_store() -> RecipeStore {
        RecipeStore::builder()
            .element("m1", 1, [("water", "earth")])
            .element("m2", 2, [("m1", "fire")])
            .element("m3", 3, [("m2", "fire")])
            .element("s", 4, [("water", "fire"), ("m3", "air")])
            .element("d", 5, [("s", "water")])
            .element("t", 6, [("d", "fire"), ("s", "air")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_derivation() {
        let store = store();
        let trees = run(&store, "mud", 1, 15);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].sources, Some(IngredientPair::new("water", "earth")));
        assert_eq!(trees[0].node_count(), 3);
    }

    #[test]
    fn test_multiple_derivations_up_to_quota() {
        let store = store();
        // stone has two derivations; wall = stone x stone gives four
        assert_eq!(run(&store, "stone", 10, 15).len(), 2);
        assert_eq!(run(&store, "wall", 10, 15).len(), 4);
        assert_eq!(run(&store, "wall", 3, 15).len(), 3);
    }

    #[test]
    fn test_depth_bound_prunes() {
        let store = store();
        // castle needs height 4: castle -> wall -> stone -> lava -> fire
        assert!(run(&store, "castle", 1, 3).is_empty());
        let trees = run(&store, "castle", 1, 4);
        assert_eq!(trees.len(), 1);
        assert!(trees[0].height() <= 4);
    }

    #[test]
    fn test_cached_subtree_respects_depth() {
        let store = store();
        let config = SearchConfig::default();
        let ctx = SearchContext::new(&store, &config, 10);

        // stone resolved at the root has height 2
        assert!(matches!(
            resolve(&ctx, "stone", &[], 0, 3, &ctx.cancel),
            Resolution::Complete { .. }
        ));
        // the same cached entry must not be reused two levels down with bound 3
        assert!(matches!(
            resolve(&ctx, "stone", &[], 2, 3, &ctx.cancel),
            Resolution::Unresolved { pruned: true }
        ));
    }

    #[test]
    fn test_ancestor_on_path_is_unresolved() {
        let store = store();
        let config = SearchConfig::default();
        let ctx = SearchContext::new(&store, &config, 1);
        assert!(matches!(
            resolve(&ctx, "mud", &["wall", "mud"], 2, 15, &ctx.cancel),
            Resolution::Unresolved { pruned: true }
        ));
    }

    #[test]
    fn test_base_and_unknown() {
        let store = store();
        let trees = run(&store, "air", 3, 15);
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_leaf());
        assert!(run(&store, "gold", 3, 15).is_empty());
    }

    #[test]
    fn test_cancelled_search_returns_nothing() {
        let store = store();
        let config = SearchConfig::default();
        let ctx = SearchContext::new(&store, &config, 5);
        ctx.cancel.cancel();
        assert!(search(&ctx, "wall", 15).is_empty());
    }

    #[test]
    fn test_shallow_entry_not_reused_with_more_depth() {
        let store = tall_short_store();
        let config = SearchConfig {
            max_total_workers: 0,
            ..SearchConfig::default()
        };
        let ctx = SearchContext::new(&store, &config, 10);

        // With 3 levels left only the short recipe of s fits
        let Resolution::Complete { trees, pruned } = resolve(&ctx, "s", &[], 2, 5, &ctx.cancel)
        else {
            panic!("s should resolve");
        };
        assert_eq!(trees.len(), 1);
        assert!(pruned);

        // With 4 levels left the tall one fits too
        let Resolution::Complete { trees, pruned } = resolve(&ctx, "s", &[], 1, 5, &ctx.cancel)
        else {
            panic!("s should resolve");
        };
        assert_eq!(trees.len(), 2);
        assert!(!pruned);
        assert_eq!(ctx.memo.get("s").unwrap().budget, None);
    }

    #[test]
    fn test_depth_bound_keeps_taller_alternatives() {
        let store = tall_short_store();
        for workers in [0, 1, 64] {
            let config = SearchConfig {
                max_total_workers: workers,
                ..SearchConfig::default()
            };
            let ctx = SearchContext::new(&store, &config, 10);
            // (d, fire) with short s, (s, air) with short and tall s
            assert_eq!(search(&ctx, "t", 5).len(), 3, "{} workers", workers);
        }
    }

    #[test]
    fn test_unbuildable_is_not_pruned() {
        let store = store();
        let config = SearchConfig::default();
        let ctx = SearchContext::new(&store, &config, 1);
        assert!(matches!(
            resolve(&ctx, "gold", &[], 0, 15, &ctx.cancel),
            Resolution::Unresolved { pruned: false }
        ));
    }
}
