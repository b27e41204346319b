// src/search/bfs.rs

//! Breadth-first multi-path search
//!
//! Every queued state is a complete derivation tree plus a cursor into its
//! level-order node list. Popping a state emits its tree; its successors are
//! copies in which exactly one internal node at or after the cursor switches
//! to another valid ingredient pair, with that node's new subtree filled by
//! the shortest derivation of each ingredient. Successors continue from the
//! position they changed, so no tree is produced twice.
//!
//! The initial states are the target's valid pairs in source order, each
//! completed with shortest subtrees. FIFO order therefore yields trees with
//! the fewest and shallowest deviations first, and the whole sequence is
//! independent of the quota: a smaller quota returns a prefix of a larger
//! one.

use super::SearchContext;
use super::gate::candidate_pairs;
use crate::store::IngredientPair;
use crate::tree::DerivationNode;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

struct QueuedTree {
    tree: Arc<DerivationNode>,
    /// First level-order position this state may still vary
    cursor: usize,
}

/// A node located in a tree by level-order traversal
struct Slot<'t> {
    node: &'t Arc<DerivationNode>,
    /// Child indices from the root
    path: Vec<usize>,
    /// Elements above this node, root first
    ancestors: Vec<&'t str>,
}

pub(crate) fn search(ctx: &SearchContext<'_>, target: &str) -> Vec<Arc<DerivationNode>> {
    if ctx.store.is_base(target) {
        return vec![Arc::new(DerivationNode::leaf(target))];
    }

    let mut queue: VecDeque<QueuedTree> = candidate_pairs(ctx.store, target, &[])
        .into_iter()
        .filter_map(|pair| step(ctx, target, pair, &[target]))
        .map(|tree| QueuedTree { tree, cursor: 1 })
        .collect();

    debug!("BFS seeded {} top-level derivations of {}", queue.len(), target);

    let mut results = Vec::new();
    while let Some(QueuedTree { tree, cursor }) = queue.pop_front() {
        ctx.visits.record();
        results.push(tree.clone());
        if results.len() >= ctx.quota {
            break;
        }

        for (position, slot) in level_order(&tree).into_iter().enumerate().skip(cursor) {
            // States already queued are emitted first; anything pushed past
            // the remaining quota would never be reached
            if results.len() + queue.len() >= ctx.quota {
                break;
            }
            let Some(current) = &slot.node.sources else {
                continue;
            };

            let mut ancestors = slot.ancestors.clone();
            ancestors.push(&slot.node.name);

            for pair in candidate_pairs(ctx.store, &slot.node.name, &slot.ancestors) {
                if pair == current {
                    continue;
                }
                if let Some(subtree) = step(ctx, &slot.node.name, pair, &ancestors) {
                    trace!("BFS varies {} at position {} to {}", slot.node.name, position, pair);
                    queue.push_back(QueuedTree {
                        tree: replace_at(&tree, &slot.path, subtree),
                        cursor: position + 1,
                    });
                }
            }
        }
    }

    results
}

/// Build `product` from `pair`, using the shortest derivation of each ingredient
fn step(
    ctx: &SearchContext<'_>,
    product: &str,
    pair: &IngredientPair,
    ancestors: &[&str],
) -> Option<Arc<DerivationNode>> {
    let left = shortest(ctx, pair.first(), ancestors)?;
    let right = shortest(ctx, pair.second(), ancestors)?;
    Some(Arc::new(DerivationNode::combine(product, pair.clone(), left, right)))
}

/// Minimum-height derivation of an element, first pair in source order on ties
///
/// Memoized per element: the tier gate means no ancestor can ever appear
/// among an element's ingredients, so the answer does not depend on the path
/// it was reached by. Unreachable elements are cached as an empty entry.
fn shortest(
    ctx: &SearchContext<'_>,
    element: &str,
    ancestors: &[&str],
) -> Option<Arc<DerivationNode>> {
    if let Some(entry) = ctx.memo.get(element) {
        return entry.trees.first().cloned();
    }
    ctx.visits.record();

    let mut path = ancestors.to_vec();
    path.push(element);

    let mut best: Option<Arc<DerivationNode>> = None;
    for pair in candidate_pairs(ctx.store, element, ancestors) {
        let Some(candidate) = step(ctx, element, pair, &path) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| candidate.height() < b.height()) {
            best = Some(candidate);
        }
    }

    ctx.memo.put(element, best.iter().cloned().collect());
    best
}

/// Nodes of a tree in level order
fn level_order(root: &Arc<DerivationNode>) -> Vec<Slot<'_>> {
    let mut slots = Vec::new();
    let mut pending = VecDeque::from([Slot {
        node: root,
        path: Vec::new(),
        ancestors: Vec::new(),
    }]);

    while let Some(slot) = pending.pop_front() {
        if let Some(children) = &slot.node.children {
            for (index, child) in children.iter().enumerate() {
                let mut path = slot.path.clone();
                path.push(index);
                let mut ancestors = slot.ancestors.clone();
                ancestors.push(slot.node.name.as_str());
                pending.push_back(Slot {
                    node: child,
                    path,
                    ancestors,
                });
            }
        }
        slots.push(slot);
    }
    slots
}

/// Copy the spine from the root to `path`, swapping in `replacement` at its end
fn replace_at(
    node: &Arc<DerivationNode>,
    path: &[usize],
    replacement: Arc<DerivationNode>,
) -> Arc<DerivationNode> {
    let Some((&index, rest)) = path.split_first() else {
        return replacement;
    };
    let Some(children) = &node.children else {
        return node.clone();
    };

    let mut children = children.clone();
    children[index] = replace_at(&children[index], rest, replacement);
    Arc::new(DerivationNode {
        name: node.name.clone(),
        sources: node.sources.clone(),
        children: Some(children),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::store::RecipeStore;

    fn store() -> RecipeStore {
        RecipeStore::builder()
            .element("mud", 1, [("water", "earth"), ("earth", "water")])
            .element("lava", 1, [("fire", "earth")])
            .element("stone", 2, [("lava", "air"), ("mud", "lava")])
            .element("wall", 3, [("stone", "stone"), ("stone", "mud")])
            .build()
            .unwrap()
    }

    fn run(store: &RecipeStore, target: &str, quota: usize) -> Vec<Arc<DerivationNode>> {
        let config = SearchConfig::default();
        let ctx = SearchContext::new(store, &config, quota);
        search(&ctx, target)
    }

    #[test]
    fn test_first_tree_is_shortest() {
        let store = store();
        let trees = run(&store, "stone", 1);
        assert_eq!(trees.len(), 1);
        // (lava, air) has height 2, (mud, lava) also 2; source order wins
        assert_eq!(trees[0].sources, Some(IngredientPair::new("lava", "air")));
        assert_eq!(trees[0].height(), 2);
    }

    #[test]
    fn test_enumerates_distinct_trees() {
        let store = store();
        let trees = run(&store, "stone", 10);
        // (lava, air) x 1 lava recipe, (mud, lava) x 2 mud recipes
        assert_eq!(trees.len(), 3);
        for (i, a) in trees.iter().enumerate() {
            for b in &trees[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_quota_prefix() {
        let store = store();
        let all = run(&store, "wall", 20);
        for quota in 1..all.len() {
            let prefix = run(&store, "wall", quota);
            assert_eq!(prefix.as_slice(), &all[..quota]);
        }
    }

    #[test]
    fn test_deterministic() {
        let store = store();
        assert_eq!(run(&store, "wall", 7), run(&store, "wall", 7));
    }

    #[test]
    fn test_level_order_positions() {
        let store = store();
        let tree = run(&store, "stone", 1).remove(0);
        let names: Vec<&str> = level_order(&tree)
            .iter()
            .map(|slot| slot.node.name.as_str())
            .collect();
        assert_eq!(names, vec!["stone", "lava", "air", "fire", "earth"]);
    }

    #[test]
    fn test_replace_at_copies_spine_only() {
        let store = store();
        let tree = run(&store, "stone", 1).remove(0);
        let replaced = replace_at(&tree, &[1], Arc::new(DerivationNode::leaf("fire")));

        let [left, right] = replaced.children.as_ref().unwrap();
        assert_eq!(right.name, "fire");
        // The untouched sibling is shared, not copied
        assert!(Arc::ptr_eq(left, &tree.children.as_ref().unwrap()[0]));
    }

    #[test]
    fn test_base_target() {
        let store = store();
        let trees = run(&store, "fire", 5);
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_leaf());
    }

    #[test]
    fn test_unknown_target() {
        let store = store();
        assert!(run(&store, "gold", 5).is_empty());
    }
}
