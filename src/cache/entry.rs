//! Cache Entry Module
//!
//! Defines a completed result together with the instant it was stored.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A successfully completed result.
///
/// Entries are never mutated in place; a later success for the same key
/// replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was stored
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served for the given TTL.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale, so a
    /// read at exactly `stored_at + ttl` re-executes.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_fresh_within_ttl() {
        let entry = CacheEntry::new("user-1");

        tokio::time::advance(Duration::from_millis(999)).await;

        assert_eq!(entry.value, "user-1");
        assert!(entry.is_fresh(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_stale_at_boundary() {
        let entry = CacheEntry::new(42u32);

        tokio::time::advance(Duration::from_secs(1)).await;

        assert!(!entry.is_fresh(Duration::from_secs(1)), "age == ttl is stale");
        assert_eq!(entry.age(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_is_never_fresh() {
        let entry = CacheEntry::new(());
        assert!(!entry.is_fresh(Duration::ZERO));
    }
}
