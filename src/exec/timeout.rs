//! Timeout Wrapper
//!
//! Races a spawned operation against a timer. Losing the race does not
//! cancel the operation: the task is detached and runs to completion.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tracing::debug;

use crate::error::{RequestError, Result};

/// Runs `operation` on the runtime and waits at most `timeout` for it.
///
/// On timeout the caller gets [`RequestError::Timeout`] while the operation
/// keeps running in the background. Callers that need real cancellation must
/// pass an operation that observes its own cancellation signal.
///
/// # Example
/// ```ignore
/// let user = execute_with_timeout(|| fetch_user(1), Duration::from_secs(2)).await?;
/// ```
pub async fn execute_with_timeout<T, E, F, Fut>(operation: F, timeout: Duration) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    race_spawned(guarded(operation()), timeout).await
}

/// Spawns `work` and races its completion against `timeout`.
pub(crate) async fn race_spawned<T, E, Fut>(work: Fut, timeout: Duration) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let handle = tokio::spawn(work);

    match tokio::time::timeout(timeout, handle).await {
        Ok(joined) => joined?,
        Err(_) => {
            debug!(
                timeout_ms = timeout.as_millis() as u64,
                "Operation lost the race against its timeout, detaching"
            );
            Err(RequestError::Timeout(timeout))
        }
    }
}

/// Maps the operation's error into [`RequestError::Operation`] and a panic
/// into [`RequestError::Aborted`], so spawned work always settles.
pub(crate) async fn guarded<T, E, Fut>(operation: Fut) -> Result<T, E>
where
    Fut: Future<Output = std::result::Result<T, E>>,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(outcome) => outcome.map_err(RequestError::Operation),
        Err(_) => Err(RequestError::Aborted("operation panicked".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test(start_paused = true)]
    async fn test_completes_before_timeout() {
        let result = execute_with_timeout(
            || async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, String>("done")
            },
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(assert_ok!(result), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_error_passes_through() {
        let result =
            execute_with_timeout(|| async { Err::<(), _>("refused") }, Duration::from_secs(1))
                .await;

        assert_eq!(assert_err!(result), RequestError::Operation("refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_operation_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let result = execute_with_timeout(
            move || async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, String>(())
            },
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(result, Err(RequestError::Timeout(Duration::from_secs(1))));
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(finished.load(Ordering::SeqCst), "detached operation should finish");
    }

    #[tokio::test]
    async fn test_panic_becomes_aborted() {
        let result = execute_with_timeout(
            || async {
                if true {
                    panic!("backend client bug");
                }
                Ok::<(), String>(())
            },
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(RequestError::Aborted(_))));
    }
}
