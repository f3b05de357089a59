//! Cache Entry Module
//!
//! Defines a single stored key/value pair and its links in the recency order.

// == Slot Index ==
/// Sentinel slot index meaning "no entry".
pub const NIL: usize = usize::MAX;

// == Entry ==
/// One stored key/value pair plus its position in the recency list.
///
/// `prev` points towards the head (more recently used), `next` towards the
/// tail (less recently used). Both are slot indices into the owning arena,
/// `NIL` when absent.
#[derive(Debug, Clone)]
pub struct Entry {
    key: String,
    pub(crate) value: String,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

impl Entry {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: String, value: String) -> Self {
        Self {
            key,
            value,
            prev: NIL,
            next: NIL,
        }
    }

    /// The entry's key. Keys never change once stored.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    // == Size ==
    /// Byte cost charged against the cache budget: `|key| + |value|`.
    pub fn size(&self) -> usize {
        entry_size(&self.key, &self.value)
    }

    /// Consumes the entry, yielding its key and value.
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

/// Byte cost of a key/value pair.
pub fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
