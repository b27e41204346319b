// src/tree.rs

//! Derivation tree model
//!
//! A [`DerivationNode`] is one synthesis step: the element it produces, the
//! ingredient pair used, and the two child derivations of those ingredients.
//! Leaves are base elements and carry neither sources nor children.
//!
//! Children are held in `Arc`s so a memoized subtree can be attached under
//! several parents of one search without copying it. Nodes are never mutated
//! after construction.
//!
//! The JSON shape mirrors the struct:
//!
//! ```json
//! { "name": "brick", "sources": ["mud", "fire"],
//!   "children": [ { "name": "mud", ... },
//!                 { "name": "fire", "sources": null, "children": null } ] }
//! ```

use crate::store::IngredientPair;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One step of a derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationNode {
    /// Element produced at this step
    pub name: String,
    /// Ingredient pair used, `None` for leaves
    pub sources: Option<IngredientPair>,
    /// Derivations of the two ingredients, `None` for leaves
    pub children: Option<[Arc<DerivationNode>; 2]>,
}

impl DerivationNode {
    /// A leaf for a base element
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: None,
            children: None,
        }
    }

    /// A step combining two resolved ingredients
    pub fn combine(
        name: impl Into<String>,
        sources: IngredientPair,
        left: Arc<DerivationNode>,
        right: Arc<DerivationNode>,
    ) -> Self {
        Self {
            name: name.into(),
            sources: Some(sources),
            children: Some([left, right]),
        }
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Nodes in this tree: itself plus all descendants
    ///
    /// Shared subtrees count once per occurrence.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |[left, right]| left.node_count() + right.node_count())
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |[left, right]| 1 + left.height().max(right.height()))
    }

    /// Visit every node in pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DerivationNode)) {
        visit(self);
        if let Some([left, right]) = &self.children {
            left.walk(visit);
            right.walk(visit);
        }
    }

    /// Names of the leaves, left to right
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.walk(&mut |node| {
            if node.is_leaf() {
                leaves.push(node.name.as_str());
            }
        });
        leaves
    }
}

/// Total node count across a list of trees
pub fn total_nodes(trees: &[Arc<DerivationNode>]) -> usize {
    trees.iter().map(|tree| tree.node_count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> DerivationNode {
        let mud = DerivationNode::combine(
            "mud",
            IngredientPair::new("water", "earth"),
            Arc::new(DerivationNode::leaf("water")),
            Arc::new(DerivationNode::leaf("earth")),
        );
        DerivationNode::combine(
            "brick",
            IngredientPair::new("mud", "fire"),
            Arc::new(mud),
            Arc::new(DerivationNode::leaf("fire")),
        )
    }

    #[test]
    fn test_leaf() {
        let leaf = DerivationNode::leaf("water");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.node_count(), 1);
        assert_eq!(leaf.height(), 0);
    }

    #[test]
    fn test_node_count_and_height() {
        let tree = brick();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaves(), vec!["water", "earth", "fire"]);
    }

    #[test]
    fn test_shared_subtree_counts_per_occurrence() {
        let water = Arc::new(DerivationNode::leaf("water"));
        let lake = DerivationNode::combine(
            "lake",
            IngredientPair::new("water", "water"),
            water.clone(),
            water,
        );
        assert_eq!(lake.node_count(), 3);
        assert_eq!(total_nodes(&[Arc::new(lake.clone()), Arc::new(lake)]), 6);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(brick()).unwrap();
        assert_eq!(json["name"], "brick");
        assert_eq!(json["sources"], serde_json::json!(["mud", "fire"]));
        assert_eq!(json["children"][1]["name"], "fire");
        assert!(json["children"][1]["sources"].is_null());
        assert!(json["children"][1]["children"].is_null());
    }

    #[test]
    fn test_json_roundtrip_preserves_structure() {
        let tree = brick();
        let json = serde_json::to_string(&tree).unwrap();
        let parsed: DerivationNode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tree);
    }
}
