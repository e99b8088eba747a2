//! Cache Store Module
//!
//! Holds the completed-result map and the in-flight registry that a
//! `RequestCache` guards behind a single lock.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, PendingRequest, SharedOutcome};

// == Cache Store ==
/// Completed results and pending executions, keyed by logical request key.
#[derive(Debug)]
pub struct CacheStore<V, E> {
    /// Completed results
    entries: HashMap<String, CacheEntry<V>>,
    /// Executions in flight, at most one per key
    pending: HashMap<String, PendingRequest<V, E>>,
    /// Lookup counters
    stats: CacheStats,
    next_pending_id: u64,
}

impl<V, E> CacheStore<V, E> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            stats: CacheStats::new(),
            next_pending_id: 0,
        }
    }

    // == Insert ==
    /// Stores a completed value, replacing any previous entry for the key.
    pub fn insert(&mut self, key: String, value: V) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    // == Get Fresh ==
    /// Returns the value for `key` if it is younger than `ttl`.
    ///
    /// A stale entry is removed. Both stale and missing entries count as misses.
    pub fn get_fresh(&mut self, key: &str, ttl: Duration) -> Option<V>
    where
        V: Clone,
    {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(ttl) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Returns the stored entry regardless of age, without touching counters.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Remove ==
    /// Removes one completed entry. Returns true if it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every completed entry. Pending executions are left alone.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Purge Older Than ==
    /// Removes completed entries whose age is at least `max_age`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_older_than(&mut self, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(max_age));
        before - self.entries.len()
    }

    // == Pending Registry ==
    /// Returns a handle on the in-flight execution for `key`, if any.
    pub fn pending(&self, key: &str) -> Option<SharedOutcome<V, E>> {
        self.pending.get(key).map(|p| p.outcome.clone())
    }

    /// Reserves an id for a new execution.
    pub fn next_pending_id(&mut self) -> u64 {
        self.next_pending_id += 1;
        self.next_pending_id
    }

    /// Registers an in-flight execution for `key`.
    pub fn register_pending(&mut self, key: String, id: u64, outcome: SharedOutcome<V, E>) {
        self.pending.insert(key, PendingRequest { id, outcome });
    }

    /// Removes the pending entry for `key` if it still belongs to execution `id`.
    pub fn settle_pending(&mut self, key: &str, id: u64) -> bool {
        match self.pending.get(key) {
            Some(p) if p.id == id => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // == Stats ==
    /// Returns a snapshot of contents and counters.
    pub fn stats(&self) -> CacheStats {
        let mut cache_keys: Vec<String> = self.entries.keys().cloned().collect();
        cache_keys.sort();

        CacheStats {
            cache_size: self.entries.len(),
            pending_requests: self.pending.len(),
            cache_keys,
            ..self.stats.clone()
        }
    }
}

impl<V, E> Default for CacheStore<V, E> {
    fn default() -> Self {
        Self::new()
    }
}
