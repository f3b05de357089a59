//! LRU Store - a byte-bounded in-memory key-value store
//!
//! Keeps the sum of key and value sizes under a fixed budget by evicting the
//! least recently used entries, and serves it over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use cache::SimpleLru;
pub use config::Config;
pub use error::{CacheError, Result};
pub use storage::Storage;
