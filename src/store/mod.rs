// src/store/mod.rs

//! Recipe store: the immutable element database every search reads
//!
//! Each element has a tier and an ordered list of alternative ingredient
//! pairs that produce it. The store is built once (from JSON or with
//! [`RecipeStoreBuilder`]) and never mutated afterwards, so any number of
//! search threads can share it behind an `Arc` without locking.
//!
//! # Terminology
//!
//! - **Base element**: tier 0 primitive (water, fire, earth, air by default);
//!   always a valid leaf.
//! - **Unbuildable element**: not a base element and has no recipes (or is
//!   not in the store at all). Pairs containing one are skipped.

mod loader;

pub use loader::RawElement;

use crate::config::DEFAULT_BASE_ELEMENTS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::warn;

/// Integer rank of an element; ingredients always have a lower tier
pub type Tier = u32;

/// An ordered pair of ingredients that combine into an element
///
/// Serializes as a two-element JSON array, `["mud", "fire"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientPair(pub String, pub String);

impl IngredientPair {
    /// Create a pair from two ingredient names
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(first.into(), second.into())
    }

    /// First ingredient
    pub fn first(&self) -> &str {
        &self.0
    }

    /// Second ingredient
    pub fn second(&self) -> &str {
        &self.1
    }

    /// Both ingredients, in order
    pub fn ingredients(&self) -> [&str; 2] {
        [&self.0, &self.1]
    }

    /// Check whether either ingredient is `name`
    pub fn contains(&self, name: &str) -> bool {
        self.0 == name || self.1 == name
    }
}

impl fmt::Display for IngredientPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.0, self.1)
    }
}

/// Tier and recipes of a single element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub tier: Tier,
    pub recipes: Vec<IngredientPair>,
}

/// One place an element is used as an ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    /// Element the recipe produces
    pub product: String,
    /// Index into the product's recipe list
    pub recipe: usize,
}

/// Immutable element database
#[derive(Debug)]
pub struct RecipeStore {
    elements: HashMap<String, ElementInfo>,
    base: HashSet<String>,
    /// Reverse index: ingredient -> recipes it appears in
    uses: HashMap<String, Vec<Usage>>,
}

impl RecipeStore {
    /// Start building a store in memory
    pub fn builder() -> RecipeStoreBuilder {
        RecipeStoreBuilder::new()
    }

    /// Tier of an element, `None` if the store has never heard of it
    pub fn tier_of(&self, element: &str) -> Option<Tier> {
        self.elements.get(element).map(|info| info.tier)
    }

    /// Recipes of an element in source order (empty if unknown)
    pub fn recipes_of(&self, element: &str) -> &[IngredientPair] {
        self.elements
            .get(element)
            .map(|info| info.recipes.as_slice())
            .unwrap_or(&[])
    }

    /// Full entry for an element
    pub fn get(&self, element: &str) -> Option<&ElementInfo> {
        self.elements.get(element)
    }

    /// Check if an element is in the base set
    pub fn is_base(&self, element: &str) -> bool {
        self.base.contains(element)
    }

    /// Check if an element can never be derived (not base, no recipes)
    pub fn is_unbuildable(&self, element: &str) -> bool {
        !self.is_base(element) && self.recipes_of(element).is_empty()
    }

    /// Check if an element exists in the store
    pub fn contains(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }

    /// Recipes that use `element` as an ingredient
    pub fn uses_of(&self, element: &str) -> &[Usage] {
        self.uses.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base elements, sorted
    pub fn base_elements(&self) -> Vec<&str> {
        let mut base: Vec<&str> = self.base.iter().map(String::as_str).collect();
        base.sort_unstable();
        base
    }

    /// All element names, sorted
    pub fn elements(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of recipes across all elements
    pub fn recipe_count(&self) -> usize {
        self.elements.values().map(|info| info.recipes.len()).sum()
    }

    /// Number of elements at each tier
    pub fn tier_histogram(&self) -> BTreeMap<Tier, usize> {
        let mut histogram = BTreeMap::new();
        for info in self.elements.values() {
            *histogram.entry(info.tier).or_insert(0) += 1;
        }
        histogram
    }

    /// Elements that are neither base nor have any recipe, sorted
    pub fn unbuildable_elements(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .elements
            .keys()
            .map(String::as_str)
            .filter(|name| self.is_unbuildable(name))
            .collect();
        names.sort_unstable();
        names
    }
}

/// In-memory constructor for [`RecipeStore`]
#[derive(Debug)]
pub struct RecipeStoreBuilder {
    elements: BTreeMap<String, ElementInfo>,
    base: Vec<String>,
}

impl Default for RecipeStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStoreBuilder {
    /// Create a builder with the default base set
    pub fn new() -> Self {
        Self {
            elements: BTreeMap::new(),
            base: DEFAULT_BASE_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the base set
    pub fn base_elements<I, S>(mut self, base: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base = base.into_iter().map(Into::into).collect();
        self
    }

    /// Add (or replace) an element with its recipes
    pub fn element<I>(mut self, name: impl Into<String>, tier: Tier, recipes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let recipes = recipes
            .into_iter()
            .map(|(a, b)| IngredientPair::new(a, b))
            .collect();
        self.elements.insert(name.into(), ElementInfo { tier, recipes });
        self
    }

    /// Add (or replace) an element from owned parts
    pub fn insert(&mut self, name: String, info: ElementInfo) {
        self.elements.insert(name, info);
    }

    /// Validate and freeze the store
    ///
    /// Base elements missing from the data are added at tier 0. A base
    /// element declared at any other tier is rejected. Ingredients that
    /// reference unknown elements are kept (they are unbuildable) but
    /// reported once each.
    pub fn build(self) -> Result<RecipeStore> {
        let mut elements: HashMap<String, ElementInfo> = self.elements.into_iter().collect();

        for name in &self.base {
            match elements.get(name) {
                Some(info) if info.tier != 0 => {
                    return Err(Error::InvalidTier {
                        element: name.clone(),
                        tier: info.tier,
                    });
                }
                Some(_) => {}
                None => {
                    elements.insert(name.clone(), ElementInfo::default());
                }
            }
        }

        let mut uses: HashMap<String, Vec<Usage>> = HashMap::new();
        let mut unknown = BTreeSet::new();

        // Walk products in sorted order so each reverse-index list is deterministic
        let mut products: Vec<&String> = elements.keys().collect();
        products.sort_unstable();

        for product in products {
            for (index, pair) in elements[product].recipes.iter().enumerate() {
                for ingredient in pair.ingredients() {
                    if !elements.contains_key(ingredient) {
                        unknown.insert(ingredient.to_string());
                    }
                }

                let usage = Usage {
                    product: product.clone(),
                    recipe: index,
                };
                uses.entry(pair.0.clone()).or_default().push(usage.clone());
                if pair.1 != pair.0 {
                    uses.entry(pair.1.clone()).or_default().push(usage);
                }
            }
        }

        for name in &unknown {
            warn!(
                "Recipe ingredient '{}' is not a known element; treating it as unbuildable",
                name
            );
        }

        Ok(RecipeStore {
            elements,
            base: self.base.into_iter().collect(),
            uses,
        })
    }
}
