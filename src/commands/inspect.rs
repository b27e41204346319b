// src/commands/inspect.rs

//! `alchemist inspect`: show how an element's recipes fare against the tier gate

use super::{load_config, load_store, normalize_element};
use alchemist::RecipeStore;
use alchemist::search::gate::{is_valid_step, passes_tier_gate};
use anyhow::{Result, bail};
use std::path::Path;

/// Print an element's tier, its recipes, and where it is used
pub fn cmd_inspect(element: &str, recipes: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let store = load_store(recipes, &config)?;
    let element = normalize_element(element);

    let Some(info) = store.get(&element) else {
        bail!("Element '{}' is not in the recipe database", element);
    };

    println!("{} (tier {})", element, info.tier);
    if store.is_base(&element) {
        println!("  base element");
    } else if info.recipes.is_empty() {
        println!("  unbuildable: no recipes");
    }

    if !info.recipes.is_empty() {
        println!("\nRecipes ({}):", info.recipes.len());
        for pair in &info.recipes {
            let verdict = describe_pair(&store, &element, info.tier, pair);
            println!("  {:<40} {}", pair.to_string(), verdict);
        }
    }

    let uses = store.uses_of(&element);
    if !uses.is_empty() {
        println!("\nUsed in {} recipes", uses.len());
    }
    Ok(())
}

fn describe_pair(
    store: &RecipeStore,
    product: &str,
    tier: alchemist::Tier,
    pair: &alchemist::IngredientPair,
) -> String {
    if !passes_tier_gate(store, tier, pair) {
        let tiers: Vec<String> = pair
            .ingredients()
            .iter()
            .map(|i| match store.tier_of(i) {
                Some(t) => format!("{}={}", i, t),
                None => format!("{}=?", i),
            })
            .collect();
        return format!("rejected by tier gate ({})", tiers.join(", "));
    }
    if !is_valid_step(store, product, pair) {
        let unbuildable: Vec<&str> = pair
            .ingredients()
            .into_iter()
            .filter(|i| store.is_unbuildable(i))
            .collect();
        return format!("unbuildable ingredient: {}", unbuildable.join(", "));
    }
    "ok".to_string()
}
