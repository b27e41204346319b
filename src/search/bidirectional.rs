// src/search/bidirectional.rs

//! Bidirectional search: bottom-up reachability, top-down resolution
//!
//! The bottom-up half grows a [`Frontier`] from the base elements through
//! the store's reverse index. An element joins the frontier once some pair
//! that produces it has both ingredients already on the frontier and passes
//! the tier gate. Only those pairs are recorded, so the frontier answers
//! "can this element be built at all" in O(1) and hands the top-down half
//! nothing but pairs known to be resolvable.
//!
//! The top-down half resolves the target through the same concurrent
//! fan-out as depth-first search. It needs no depth bound or path set: every
//! frontier pair passed the tier gate, so recursion strictly descends tiers.

use super::SearchContext;
use super::fanout::CancelToken;
use super::gate::passes_tier_gate;
use crate::store::{IngredientPair, RecipeStore};
use crate::tree::DerivationNode;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

/// Elements reachable from the base set, with the pairs that reach them
#[derive(Debug, Default)]
pub struct Frontier {
    reached: HashSet<String>,
    /// Non-base elements only, pairs in source order
    pairs: HashMap<String, Vec<IngredientPair>>,
}

impl Frontier {
    /// Expand outward from the base elements until nothing new is reachable
    pub fn build(store: &RecipeStore) -> Self {
        let mut reached: HashSet<String> = HashSet::new();
        let mut found: HashMap<&str, BTreeSet<usize>> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for base in store.base_elements() {
            reached.insert(base.to_string());
            queue.push_back(base);
        }

        while let Some(element) = queue.pop_front() {
            for usage in store.uses_of(element) {
                let product = usage.product.as_str();
                if store.is_base(product) {
                    continue;
                }
                let Some(pair) = store.recipes_of(product).get(usage.recipe) else {
                    continue;
                };
                // Wait until the other ingredient is reached too
                if !pair.ingredients().iter().all(|i| reached.contains(*i)) {
                    continue;
                }
                let Some(tier) = store.tier_of(product) else {
                    continue;
                };
                if !passes_tier_gate(store, tier, pair) {
                    trace!("Frontier rejects {} for {} (tier gate)", pair, product);
                    continue;
                }

                found.entry(product).or_default().insert(usage.recipe);
                if reached.insert(product.to_string()) {
                    queue.push_back(product);
                }
            }
        }

        let pairs: HashMap<String, Vec<IngredientPair>> = found
            .into_iter()
            .map(|(product, indices)| {
                let recipes = store.recipes_of(product);
                let list = indices.into_iter().map(|i| recipes[i].clone()).collect();
                (product.to_string(), list)
            })
            .collect();

        debug!(
            "Frontier reaches {} of {} elements",
            reached.len(),
            store.len()
        );

        Self { reached, pairs }
    }

    /// Check if an element can be derived from base elements
    pub fn contains(&self, element: &str) -> bool {
        self.reached.contains(element)
    }

    /// Resolvable pairs of a non-base element, in source order
    pub fn pairs_of(&self, element: &str) -> &[IngredientPair] {
        self.pairs.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of reachable elements, base elements included
    pub fn len(&self) -> usize {
        self.reached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }
}

pub(crate) fn search(
    ctx: &SearchContext<'_>,
    frontier: &Frontier,
    target: &str,
) -> Vec<Arc<DerivationNode>> {
    if !frontier.contains(target) {
        debug!("{} is not reachable from the base elements", target);
        return Vec::new();
    }
    resolve(ctx, frontier, target, &ctx.cancel)
        .iter()
        .take(ctx.quota)
        .cloned()
        .collect()
}

fn resolve(
    ctx: &SearchContext<'_>,
    frontier: &Frontier,
    element: &str,
    cancel: &CancelToken,
) -> Arc<Vec<Arc<DerivationNode>>> {
    ctx.visits.record();

    if let Some(entry) = ctx.memo.get(element) {
        return entry.trees;
    }
    if !frontier.contains(element) {
        return ctx.memo.put(element, Vec::new()).trees;
    }

    let jobs: Vec<&IngredientPair> = frontier.pairs_of(element).iter().collect();
    let outcome = ctx.fanout().run(
        element,
        ctx.pool_size(element),
        jobs,
        ctx.quota,
        cancel,
        |pair, emitter, token| {
            let left = resolve(ctx, frontier, pair.first(), token);
            if left.is_empty() {
                return;
            }
            let right = resolve(ctx, frontier, pair.second(), token);

            for l in left.iter() {
                for r in right.iter() {
                    let node = DerivationNode::combine(element, pair.clone(), l.clone(), r.clone());
                    if !emitter.emit(Arc::new(node)) {
                        return;
                    }
                }
            }
        },
    );

    if outcome.interrupted {
        return Arc::new(outcome.items);
    }
    ctx.memo.put(element, outcome.items).trees
}
