//! Cache Statistics Module
//!
//! Snapshot of the cache contents plus lookup counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of a request cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of completed entries currently stored
    pub cache_size: usize,
    /// Number of executions currently in flight through deduplication
    pub pending_requests: usize,
    /// Keys of the stored entries, sorted
    pub cache_keys: Vec<String>,
    /// Lookups served from a fresh entry
    pub hits: u64,
    /// Lookups that found no entry or a stale one
    pub misses: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }
}
