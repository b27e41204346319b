// src/commands/validate.rs

//! `alchemist validate`: load a recipe database and summarize it

use super::{load_config, load_store};
use alchemist::Frontier;
use anyhow::Result;
use std::path::Path;

/// Load the database (and config, when given) and print summary statistics
pub fn cmd_validate(recipes: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let store = load_store(recipes, &config)?;
    let frontier = Frontier::build(&store);

    println!("Recipe database: {}", recipes.display());
    println!("  Elements: {}", store.len());
    println!("  Recipes: {}", store.recipe_count());
    println!("  Base elements: {}", store.base_elements().join(", "));
    println!("  Reachable from base: {}", frontier.len());

    println!("\nElements per tier:");
    for (tier, count) in store.tier_histogram() {
        println!("  {:>3}: {}", tier, count);
    }

    let unbuildable = store.unbuildable_elements();
    if unbuildable.is_empty() {
        println!("\nNo unbuildable elements.");
    } else {
        println!("\nUnbuildable elements ({}):", unbuildable.len());
        for name in unbuildable {
            println!("  {}", name);
        }
    }
    Ok(())
}
