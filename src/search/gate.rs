// src/search/gate.rs

//! The tier gate shared by every strategy
//!
//! An ingredient pair may build an element only if both ingredients have a
//! strictly lower tier. Tiers therefore drop along every edge of a
//! derivation, which bounds its height by the number of distinct tiers and
//! rules out cycles no matter what the recipe data looks like.

use crate::store::{IngredientPair, RecipeStore, Tier};

/// Check the tier rule for one pair against the product's tier
///
/// Unknown ingredients have no tier and never pass.
pub fn passes_tier_gate(store: &RecipeStore, product_tier: Tier, pair: &IngredientPair) -> bool {
    pair.ingredients()
        .iter()
        .all(|ingredient| store.tier_of(ingredient).is_some_and(|tier| tier < product_tier))
}

/// Check that a pair is a usable step towards `product`
///
/// The pair must pass the tier gate and neither ingredient may be
/// unbuildable.
pub fn is_valid_step(store: &RecipeStore, product: &str, pair: &IngredientPair) -> bool {
    let Some(tier) = store.tier_of(product) else {
        return false;
    };
    passes_tier_gate(store, tier, pair)
        && pair
            .ingredients()
            .iter()
            .all(|ingredient| !store.is_unbuildable(ingredient))
}

/// Valid pairs for `product` in source order
///
/// Pairs that reuse an element already on the current path (`ancestors`)
/// are skipped as well. The tier gate already excludes them for consistent
/// data; the path check keeps traversal finite for data that is not.
pub fn candidate_pairs<'s>(
    store: &'s RecipeStore,
    product: &str,
    ancestors: &[&str],
) -> Vec<&'s IngredientPair> {
    store
        .recipes_of(product)
        .iter()
        .filter(|pair| is_valid_step(store, product, pair))
        .filter(|pair| !ancestors.iter().any(|ancestor| pair.contains(ancestor)))
        .collect()
}
