//! Selector result cache
//!
//! Memoizes selector → nodes for one document. Entries are only valid for
//! the tree generation they were computed at; any mutation empties the
//! cache on the next lookup.

use std::collections::HashMap;

use fq_dom::{Generation, NodeId};

/// Selector result cache with DOM generation validation
#[derive(Debug)]
pub struct SelectorCache {
    entries: HashMap<String, Vec<NodeId>>,
    /// Generation all entries were computed at
    generation: Generation,
    capacity: usize,
    hits: u64,
    misses: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl SelectorCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            generation: Generation::INITIAL,
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached result if it was computed at `generation`
    pub fn get(&mut self, selector: &str, generation: Generation) -> Option<Vec<NodeId>> {
        self.sync(generation);
        match self.entries.get(selector) {
            Some(nodes) => {
                self.hits += 1;
                Some(nodes.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a result computed at `generation`
    pub fn insert(&mut self, selector: &str, generation: Generation, nodes: Vec<NodeId>) {
        if self.capacity == 0 {
            return;
        }
        self.sync(generation);

        if self.entries.len() >= self.capacity && !self.entries.contains_key(selector) {
            // Evict an arbitrary entry; all share one generation
            if let Some(victim) = self.entries.keys().next().cloned() {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(selector.to_string(), nodes);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    fn sync(&mut self, generation: Generation) {
        if generation != self.generation {
            if !self.entries.is_empty() {
                tracing::trace!(
                    stale = self.entries.len(),
                    generation = generation.value(),
                    "selector cache invalidated"
                );
            }
            self.entries.clear();
            self.generation = generation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let mut cache = SelectorCache::new(4);
        let generation = Generation::INITIAL;
        assert_eq!(cache.get("p", generation), None);

        cache.insert("p", generation, vec![NodeId::ROOT]);
        assert_eq!(cache.get("p", generation), Some(vec![NodeId::ROOT]));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn test_new_generation_invalidates() {
        let mut cache = SelectorCache::new(4);
        cache.insert("p", Generation::INITIAL, vec![]);
        assert_eq!(cache.get("p", Generation::INITIAL.next()), None);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_capacity_bound() {
        let mut cache = SelectorCache::new(2);
        let generation = Generation::INITIAL;
        for selector in ["a", "b", "c"] {
            cache.insert(selector, generation, vec![]);
        }
        assert_eq!(cache.stats().entries, 2);
        assert!(cache.get("c", generation).is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = SelectorCache::new(0);
        cache.insert("a", Generation::INITIAL, vec![]);
        assert_eq!(cache.stats().entries, 0);
    }
}
