//! Batch Runner
//!
//! Runs operations in fixed-size groups: members of a group concurrently,
//! groups one after another. Individual failures are isolated per slot.

use std::future::Future;

use futures::future::join_all;
use tracing::debug;

use crate::error::Result;
use crate::exec::guarded;

/// Runs `operations` in contiguous groups of at most `chunk_size`.
///
/// Group `i + 1` starts only after every member of group `i` has settled.
/// The returned vector has one `Result` per operation, in input order; a
/// failing operation never aborts its group or later groups. An error is
/// reported as [`RequestError::Operation`](crate::RequestError::Operation) and
/// a panic as [`RequestError::Aborted`](crate::RequestError::Aborted). A
/// `chunk_size` of zero is treated as one.
pub async fn batch<T, E, F, Fut>(operations: Vec<F>, chunk_size: usize) -> Vec<Result<T, E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let chunk_size = chunk_size.max(1);
    let total = operations.len();
    let mut results = Vec::with_capacity(total);
    let mut remaining = operations.into_iter();

    loop {
        let group: Vec<F> = remaining.by_ref().take(chunk_size).collect();
        if group.is_empty() {
            break;
        }

        debug!(
            offset = results.len(),
            size = group.len(),
            total,
            "Running batch group"
        );
        let outcomes = join_all(group.into_iter().map(|op| guarded(op()))).await;
        results.extend(outcomes);
    }

    results
}
