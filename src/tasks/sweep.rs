//! Entry Sweep Task
//!
//! Background task that periodically drops old completed entries so keys
//! that are never read again do not accumulate. Read-time TTL stays the
//! rule for freshness; the sweep only bounds memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::RequestCache;

/// Spawns a task that removes entries at least `max_age` old every `interval`.
///
/// Pending executions are never touched.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
///
/// # Example
/// ```ignore
/// let cache: RequestCache<String, String> = RequestCache::new();
/// let sweeper = spawn_sweep_task(cache.clone(), config.sweep_interval, config.default_ttl);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweep_task<V, E>(
    cache: RequestCache<V, E>,
    interval: Duration,
    max_age: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            max_age_ms = max_age.as_millis() as u64,
            "Starting cache sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_older_than(max_age).await;
            if removed > 0 {
                info!("Cache sweep: removed {} old entries", removed);
            } else {
                debug!("Cache sweep: nothing to remove");
            }
        }
    })
}
