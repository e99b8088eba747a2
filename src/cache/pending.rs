//! Pending Request Module
//!
//! An in-flight execution that concurrent callers for the same key join.

use std::fmt;

use futures::future::{BoxFuture, Shared};

use crate::error::Result;

/// Shared handle over the outcome of one spawned execution.
pub type SharedOutcome<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

// == Pending Request ==
/// Registry entry for an operation that has not settled yet.
pub struct PendingRequest<V, E> {
    /// Distinguishes successive executions for the same key
    pub id: u64,
    /// Handle every waiter awaits
    pub outcome: SharedOutcome<V, E>,
}

impl<V, E> fmt::Debug for PendingRequest<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest").field("id", &self.id).finish()
    }
}
