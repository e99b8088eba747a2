//! Execution Module
//!
//! Combinators for running caller-supplied async operations.
//!
//! # Components
//! - Timeout: race an operation against a timer without cancelling it
//! - Parallel: all-or-nothing join in input order
//! - Batch: fixed-size groups, sequential between groups, per-slot results
//! - Retry: bounded attempts with exponential backoff and jitter

mod batch;
mod parallel;
mod retry;
mod timeout;

pub use batch::batch;
pub use parallel::execute_parallel;
pub use retry::{optimized_api_call, sample_jitter, Backoff};
pub use timeout::execute_with_timeout;

pub(crate) use timeout::{guarded, race_spawned};
