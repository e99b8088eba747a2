//! Request Cache Module
//!
//! Deduplicates concurrent executions per key and serves completed results
//! while they are younger than a caller-supplied TTL.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, SharedOutcome};
use crate::config::CacheOptions;
use crate::error::{RequestError, Result};
use crate::exec::{guarded, race_spawned};

// == Request Cache ==
/// Explicitly constructed request cache.
///
/// Cloning is cheap and yields a handle on the same maps. Values and errors
/// are `Clone` because every caller joined on one execution receives its own
/// copy of the outcome.
///
/// # Example
/// ```ignore
/// let cache: RequestCache<Vec<Product>, ApiError> = RequestCache::new();
/// let products = cache
///     .get_or_execute("products:list", || api.list_products(), CacheOptions::default())
///     .await?;
/// ```
pub struct RequestCache<V, E> {
    store: Arc<RwLock<CacheStore<V, E>>>,
}

impl<V, E> RequestCache<V, E> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new())),
        }
    }
}

impl<V, E> Clone for RequestCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V, E> Default for RequestCache<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> RequestCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    // == Execute With Dedup ==
    /// Runs `operation` unless an execution for `key` is already in flight,
    /// in which case the caller joins that execution instead.
    ///
    /// A success is stored in the cache. The pending entry is removed once
    /// the execution settles, whatever the outcome.
    pub async fn execute_with_dedup<F, Fut>(&self, key: &str, operation: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        let outcome = {
            let mut store = self.store.write().await;
            match store.pending(key) {
                Some(existing) => {
                    debug!(key, "Joining in-flight request");
                    existing
                }
                None => {
                    let id = store.next_pending_id();
                    // The settling task needs the write lock, so it cannot
                    // run its bookkeeping before registration below.
                    let handle = tokio::spawn(settle_dedup(
                        Arc::clone(&self.store),
                        key.to_string(),
                        id,
                        guarded(operation()),
                    ));
                    let outcome: SharedOutcome<V, E> = async move {
                        match handle.await {
                            Ok(outcome) => outcome,
                            Err(join_err) => Err(RequestError::from(join_err)),
                        }
                    }
                    .boxed()
                    .shared();

                    store.register_pending(key.to_string(), id, outcome.clone());
                    debug!(key, id, "Registered in-flight request");
                    outcome
                }
            }
        };

        outcome.await
    }

    // == Get Or Execute ==
    /// Returns the cached value for `key` if it is younger than `options.ttl`,
    /// otherwise runs `operation` raced against `options.timeout`.
    ///
    /// A timed-out operation is not cancelled. If it later succeeds its value
    /// is still written to the cache for subsequent callers.
    pub async fn get_or_execute<F, Fut>(
        &self,
        key: &str,
        operation: F,
        options: CacheOptions,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        let cached = self.store.write().await.get_fresh(key, options.ttl);
        if let Some(value) = cached {
            debug!(key, "Cache hit");
            return Ok(value);
        }
        debug!(key, timeout_ms = options.timeout.as_millis() as u64, "Cache miss, executing");

        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let work = guarded(operation());

        race_spawned(
            async move {
                let outcome = work.await;
                if let Ok(value) = &outcome {
                    store.write().await.insert(key, value.clone());
                }
                outcome
            },
            options.timeout,
        )
        .await
    }

    // == Prefetch ==
    /// Warms the cache through [`RequestCache::get_or_execute`].
    ///
    /// Never fails: an error is logged and reported as `None`. Use
    /// [`CacheOptions::prefetch`] for the usual 10 second deadline.
    pub async fn prefetch<F, Fut>(
        &self,
        key: &str,
        operation: F,
        options: CacheOptions,
    ) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        E: Display,
    {
        match self.get_or_execute(key, operation, options).await {
            Ok(value) => Some(value),
            Err(err) => {
                info!(key, error = %err, "Prefetch failed");
                None
            }
        }
    }
}

impl<V, E> RequestCache<V, E> {
    // == Clear ==
    /// Removes the entry for `key`, or every entry when `key` is `None`.
    ///
    /// In-flight executions are unaffected and repopulate the cache when
    /// they succeed.
    pub async fn clear(&self, key: Option<&str>) {
        let mut store = self.store.write().await;
        match key {
            Some(key) => {
                store.remove(key);
            }
            None => store.clear(),
        }
    }

    /// Removes completed entries at least `max_age` old. Returns how many.
    pub async fn purge_older_than(&self, max_age: Duration) -> usize {
        self.store.write().await.purge_older_than(max_age)
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Number of completed entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

/// Awaits one deduplicated execution, then records its outcome.
async fn settle_dedup<V, E, Fut>(
    store: Arc<RwLock<CacheStore<V, E>>>,
    key: String,
    id: u64,
    work: Fut,
) -> Result<V, E>
where
    V: Clone,
    Fut: Future<Output = Result<V, E>>,
{
    let outcome = work.await;

    let mut store = store.write().await;
    if let Ok(value) = &outcome {
        store.insert(key.clone(), value.clone());
    }
    store.settle_pending(&key, id);

    outcome
}
