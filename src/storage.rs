//! Storage Contract
//!
//! The five-operation key-value interface served by the store.

use crate::error::Result;

/// Key-value storage operations.
///
/// Every operation reports success with `Ok` and failure with a
/// [`CacheError`](crate::error::CacheError) naming the reason. A failed
/// call leaves the storage unchanged.
///
/// Implementations are not required to be thread safe; callers sharing one
/// instance must serialize access themselves.
pub trait Storage {
    /// Stores `value` under `key`, replacing any existing value.
    fn put(&mut self, key: String, value: String) -> Result<()>;

    /// Stores `value` under `key` only if the key is not present yet.
    fn put_if_absent(&mut self, key: String, value: String) -> Result<()>;

    /// Replaces the value of an existing key.
    fn set(&mut self, key: String, value: String) -> Result<()>;

    /// Removes `key`.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Returns the value stored under `key`.
    ///
    /// Takes `&mut self`: a read may reorder internal bookkeeping.
    fn get(&mut self, key: &str) -> Result<String>;
}
