//! Parallel Executor
//!
//! All-or-nothing join over independent operations.

use std::future::Future;

use futures::future::try_join_all;

use crate::error::{RequestError, Result};
use crate::exec::timeout::guarded;

/// Starts every operation at once and waits for all of them.
///
/// Results come back in input order. The first failure fails the whole call;
/// the remaining operations are detached, not cancelled, and their results
/// are discarded.
pub async fn execute_parallel<T, E, F, Fut>(operations: Vec<F>) -> Result<Vec<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let handles: Vec<_> = operations
        .into_iter()
        .map(|op| tokio::spawn(guarded(op())))
        .collect();

    try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(RequestError::from(join_err)),
        }
    }))
    .await
}
