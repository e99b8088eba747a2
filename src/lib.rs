//! Fast Cache - request orchestration for slow or flaky backends
//!
//! Provides request deduplication, TTL caching, parallel and batched
//! execution, retry with backoff, and a connection quality probe around
//! arbitrary async operations.

pub mod cache;
pub mod config;
pub mod error;
pub mod exec;
pub mod probe;
pub mod tasks;

pub use cache::{CacheStats, RequestCache};
pub use config::{CacheOptions, Config, RetryOptions};
pub use error::RequestError;
pub use exec::{batch, execute_parallel, execute_with_timeout, optimized_api_call};
pub use probe::{
    detect_connection_quality, ConnectionQuality, ConnectionStatus, HttpProbe, NetworkHints,
};
pub use tasks::spawn_sweep_task;
