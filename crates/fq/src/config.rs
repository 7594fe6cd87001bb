//! Query configuration

use serde::{Deserialize, Serialize};

/// Settings for a [`Query`](crate::Query) namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Memoize selector resolution until the document next mutates
    pub cache_selectors: bool,
    /// Maximum number of cached selectors
    pub cache_capacity: usize,
}

impl QueryConfig {
    /// Resolve every selector against the live document
    pub fn uncached() -> Self {
        Self {
            cache_selectors: false,
            ..Self::default()
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// True if selector results should be cached
    pub fn caching(&self) -> bool {
        self.cache_selectors && self.cache_capacity > 0
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_selectors: true,
            cache_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: QueryConfig = serde_json::from_str(r#"{"cache_capacity": 8}"#).unwrap();
        assert!(config.cache_selectors);
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn test_caching_requires_capacity() {
        assert!(QueryConfig::default().caching());
        assert!(!QueryConfig::uncached().caching());
        assert!(!QueryConfig::default().with_cache_capacity(0).caching());
    }

    #[test]
    fn test_round_trip_json() {
        let config = QueryConfig::uncached().with_cache_capacity(3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<QueryConfig>(&json).unwrap(), config);
    }
}
