//! Cache Module
//!
//! Request deduplication and TTL-based result caching.

mod entry;
mod pending;
mod request_cache;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use pending::{PendingRequest, SharedOutcome};
pub use request_cache::RequestCache;
pub use stats::CacheStats;
pub use store::CacheStore;
