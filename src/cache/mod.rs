//! Cache Module
//!
//! Byte-bounded in-memory key-value storage with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{Entry, NIL};
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::SimpleLru;

// == Public Constants ==
/// Byte budget used when none is configured
pub const DEFAULT_MAX_SIZE: usize = 1024;
