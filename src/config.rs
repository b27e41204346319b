// src/config.rs

//! Search tunables
//!
//! Every field has a default, so an empty (or absent) config file yields a
//! working setup.
//!
//! # Example config.toml
//!
//! ```toml
//! # Depth-first bound, overridable per request
//! max_depth = 15
//!
//! # Fan-out pool size = min_workers + workers_per_tier * tier,
//! # capped at max_workers_per_element
//! min_workers = 2
//! workers_per_tier = 2
//! max_workers_per_element = 16
//!
//! # Live worker threads allowed across one whole search
//! max_total_workers = 64
//!
//! base_elements = ["water", "fire", "earth", "air"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default depth bound for the depth-first strategy
pub const DEFAULT_MAX_DEPTH: usize = 15;

/// The four primitives every derivation bottoms out in
pub const DEFAULT_BASE_ELEMENTS: [&str; 4] = ["water", "fire", "earth", "air"];

/// Tunables shared by all search strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Depth bound for the depth-first strategy
    pub max_depth: usize,
    /// Fan-out pool size for a tier-0 element
    pub min_workers: usize,
    /// Additional fan-out workers per tier
    pub workers_per_tier: usize,
    /// Cap on a single fan-out pool
    pub max_workers_per_element: usize,
    /// Cap on live fan-out threads across one search
    pub max_total_workers: usize,
    /// Tier-0 elements that terminate every branch
    pub base_elements: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_workers: 2,
            workers_per_tier: 2,
            max_workers_per_element: 16,
            max_total_workers: 64,
            base_elements: DEFAULT_BASE_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SearchConfig {
    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that cannot drive a search
    pub fn validate(&self) -> Result<()> {
        if self.max_workers_per_element == 0 {
            return Err(Error::InvalidConfig(
                "max_workers_per_element must be at least 1".to_string(),
            ));
        }
        if self.base_elements.is_empty() {
            return Err(Error::InvalidConfig(
                "base_elements cannot be empty".to_string(),
            ));
        }
        if self.base_elements.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "base_elements cannot contain blank names".to_string(),
            ));
        }
        Ok(())
    }

    /// Fan-out pool size for an element of the given tier
    ///
    /// Higher tiers have larger subtrees below them, so they get more
    /// parallelism, up to `max_workers_per_element`.
    pub fn workers_for_tier(&self, tier: u32) -> usize {
        self.min_workers
            .saturating_add(self.workers_per_tier.saturating_mul(tier as usize))
            .clamp(1, self.max_workers_per_element.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.base_elements.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_workers_scale_with_tier() {
        let config = SearchConfig::default();
        assert_eq!(config.workers_for_tier(0), 2);
        assert_eq!(config.workers_for_tier(1), 4);
        assert_eq!(config.workers_for_tier(5), 12);
        assert_eq!(config.workers_for_tier(7), 16);
        assert_eq!(config.workers_for_tier(40), 16);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SearchConfig::from_toml_str("").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SearchConfig::from_toml_str("max_depth = 4\nmax_total_workers = 8\n").unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_total_workers, 8);
        assert_eq!(config.max_workers_per_element, 16);
    }

    #[test]
    fn test_rejects_zero_pool_cap() {
        let result = SearchConfig::from_toml_str("max_workers_per_element = 0");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_base_set() {
        let result = SearchConfig::from_toml_str("base_elements = []");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let result = SearchConfig::from_toml_str("max_dept = 3");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.toml");
        std::fs::write(&path, "min_workers = 1\nworkers_per_tier = 1\n").unwrap();

        let config = SearchConfig::from_file(&path).unwrap();
        assert_eq!(config.workers_for_tier(3), 4);
    }
}
