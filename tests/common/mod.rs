// tests/common/mod.rs

//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use alchemist::{
    DerivationNode, RecipeStore, SearchConfig, SearchRequest, SearchResult, Searcher, Strategy,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE: [&str; 4] = ["water", "fire", "earth", "air"];

/// The smallest non-trivial database: brick <- (mud, fire), mud <- (water, earth).
pub const BRICK_JSON: &str = r#"{
    "water": { "tier": 0, "recipes": [] },
    "fire":  { "tier": 0, "recipes": [] },
    "earth": { "tier": 0, "recipes": [] },
    "air":   { "tier": 0, "recipes": [] },
    "mud":   { "tier": 1, "recipes": [["water", "earth"]] },
    "brick": { "tier": 2, "recipes": [["mud", "fire"]] }
}"#;

pub fn brick_store() -> RecipeStore {
    RecipeStore::from_json_str(BRICK_JSON).unwrap()
}

/// Several alternatives per element, plus a pair the tier gate rejects
/// (brick <- stone + fire, with stone at the same tier as brick).
pub fn layered_store() -> RecipeStore {
    RecipeStore::builder()
        .element("mud", 1, [("water", "earth"), ("earth", "water")])
        .element("lava", 1, [("fire", "earth")])
        .element("steam", 1, [("water", "fire"), ("fire", "water")])
        .element("stone", 2, [("lava", "air"), ("mud", "lava"), ("earth", "lava")])
        .element("brick", 2, [("mud", "fire"), ("stone", "fire"), ("mud", "lava")])
        .element("wall", 3, [("brick", "brick"), ("stone", "brick"), ("brick", "mud")])
        .element("house", 4, [("wall", "wall"), ("wall", "brick")])
        .build()
        .unwrap()
}

/// Self-referencing recipes: `void` can only be made from itself,
/// `obsidian` has a self-referencing recipe and a valid one.
pub fn cyclic_store() -> RecipeStore {
    RecipeStore::builder()
        .element("lava", 1, [("fire", "earth")])
        .element("void", 2, [("void", "water")])
        .element("obsidian", 2, [("obsidian", "water"), ("lava", "water")])
        .element("shadow", 3, [("void", "obsidian")])
        .build()
        .unwrap()
}

/// `s` has a short recipe and one of height 4; `t` uses `s` directly and
/// through `d`, so a depth bound admits the tall `s` on only one route.
pub fn tall_short_store() -> RecipeStore {
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

pub fn searcher(store: RecipeStore) -> Searcher {
    Searcher::with_defaults(Arc::new(store))
}

/// Searcher whose whole search may hold at most `workers` live threads
pub fn searcher_with_workers(store: RecipeStore, workers: usize) -> Searcher {
    let config = SearchConfig {
        max_total_workers: workers,
        ..SearchConfig::default()
    };
    Searcher::new(Arc::new(store), config)
}

pub fn run(searcher: &Searcher, target: &str, quota: usize, strategy: Strategy) -> SearchResult {
    searcher.search(&SearchRequest::new(target, quota).strategy(strategy))
}

/// Write a recipe database into a fresh temp directory.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn write_recipes(json: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.json");
    std::fs::write(&path, json).unwrap();
    (dir, path)
}

/// Every internal node of `tree` must use a pair whose ingredients have a
/// strictly lower tier than the node itself, and match its children.
pub fn assert_tier_gate(store: &RecipeStore, tree: &DerivationNode) {
    tree.walk(&mut |node| {
        let Some(pair) = &node.sources else {
            assert!(store.is_base(&node.name), "leaf {} is not a base element", node.name);
            return;
        };
        let tier = store.tier_of(&node.name).unwrap();
        for ingredient in pair.ingredients() {
            let ingredient_tier = store.tier_of(ingredient).unwrap();
            assert!(
                ingredient_tier < tier,
                "{} (tier {}) built from {} (tier {})",
                node.name,
                tier,
                ingredient,
                ingredient_tier
            );
        }
        let [left, right] = node.children.as_ref().unwrap();
        assert_eq!(left.name, pair.first());
        assert_eq!(right.name, pair.second());
        assert!(store.recipes_of(&node.name).contains(pair));
    });
}

/// Recompute node counts the long way: 1 + children, at every node
pub fn assert_node_counts(tree: &DerivationNode) -> usize {
    let expected = 1 + tree
        .children
        .as_ref()
        .map_or(0, |[left, right]| assert_node_counts(left) + assert_node_counts(right));
    assert_eq!(tree.node_count(), expected);
    expected
}
