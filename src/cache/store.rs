//! Cache Store Module
//!
//! Byte-bounded LRU store combining the recency list, a key index and
//! capacity control.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::cache::entry::{entry_size, Entry};
use crate::cache::{CacheStats, RecencyList, DEFAULT_MAX_SIZE};
use crate::error::{CacheError, Result};
use crate::storage::Storage;

// == Simple LRU ==
/// Key-value store holding at most `max_size` bytes of keys and values.
///
/// When an insert or a value growth does not fit, least recently used
/// entries are evicted until it does. Reads count as uses.
///
/// Not thread safe. Wrap it in a lock to share it (see `AppState`).
#[derive(Debug)]
pub struct SimpleLru {
    /// Owns the entries, most recently used first
    list: RecencyList,
    /// Key to slot index in `list`
    index: HashMap<String, usize>,
    /// Performance statistics
    stats: CacheStats,
    max_size: usize,
    free_bytes: usize,
}

impl Default for SimpleLru {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl SimpleLru {
    // == Constructor ==
    /// Creates an empty store with a budget of `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            list: RecencyList::new(),
            index: HashMap::new(),
            stats: CacheStats::new(max_size),
            max_size,
            free_bytes: max_size,
        }
    }

    // == Size Check ==
    /// Rejects entries that could never fit, before anything is touched.
    fn check_size(&self, key: &str, value: &str) -> Result<usize> {
        let size = entry_size(key, value);
        if size > self.max_size {
            trace!(key, size, max_size = self.max_size, "rejecting oversized entry");
            return Err(CacheError::EntryTooLarge {
                size,
                max_size: self.max_size,
            });
        }
        Ok(size)
    }

    // == Reserve ==
    /// Evicts from the tail until at least `need` bytes are free.
    ///
    /// Callers guarantee `need` is reachable, i.e. the request passed
    /// `check_size`. The loop also stops if the list runs dry.
    fn reserve(&mut self, need: usize) {
        while self.free_bytes < need {
            let Some(entry) = self.list.evict_tail() else {
                break;
            };
            let freed = entry.size();
            self.index.remove(entry.key());
            self.free_bytes += freed;
            self.stats.record_eviction();
            debug!(key = entry.key(), freed, "evicted least recently used entry");
        }
    }

    // == Insert ==
    /// Inserts an entry for a key known to be absent.
    fn insert_new(&mut self, key: String, value: String, size: usize) {
        self.reserve(size);
        self.free_bytes -= size;
        let idx = self.list.push_front(Entry::new(key.clone(), value));
        self.index.insert(key, idx);
    }

    // == Remove ==
    /// Drops the entry at `idx` from both the list and the index.
    fn remove_at(&mut self, idx: usize) -> Option<Entry> {
        let entry = self.list.remove(idx)?;
        self.index.remove(entry.key());
        self.free_bytes += entry.size();
        Some(entry)
    }

    // == Introspection ==
    /// Returns the value stored under `key` without marking it used.
    pub fn peek(&self, key: &str) -> Option<&str> {
        let idx = *self.index.get(key)?;
        self.list.get(idx).map(|entry| entry.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.list.iter().map(|entry| entry.key().to_string()).collect()
    }

    /// Bytes currently charged against the budget.
    pub fn used_size(&self) -> usize {
        self.max_size - self.free_bytes
    }

    pub fn free_size(&self) -> usize {
        self.free_bytes
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.len(), self.used_size());
        stats
    }

    /// Panics if the list, the index and the byte accounting disagree.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        let mut total = 0;
        for entry in self.list.iter() {
            assert!(seen.insert(entry.key()), "duplicate key {:?}", entry.key());
            assert!(entry.size() <= self.max_size, "entry larger than budget");
            let idx = self
                .index
                .get(entry.key())
                .copied()
                .unwrap_or_else(|| panic!("key {:?} missing from index", entry.key()));
            assert_eq!(
                self.list.get(idx).map(Entry::key),
                Some(entry.key()),
                "index points at the wrong slot"
            );
            total += entry.size();
        }

        assert_eq!(seen.len(), self.index.len(), "index holds stale keys");
        assert_eq!(seen.len(), self.list.len());
        assert!(total <= self.max_size, "{} bytes stored over {}", total, self.max_size);
        assert_eq!(total, self.used_size(), "byte accounting drifted");

        match (self.list.head(), self.list.tail()) {
            (None, None) => assert!(self.list.is_empty()),
            (Some(head), Some(tail)) => {
                assert_eq!(head == tail, self.list.len() == 1);
                assert_eq!(self.list.get(head).map(|e| e.prev), Some(crate::cache::NIL));
                assert_eq!(self.list.get(tail).map(|e| e.next), Some(crate::cache::NIL));
            }
            _ => panic!("head and tail disagree on emptiness"),
        }
    }
}

impl Storage for SimpleLru {
    // == Put ==
    /// Stores a key-value pair, replacing the previous entry if present.
    ///
    /// The replacement is a fresh entry at the most recently used position.
    fn put(&mut self, key: String, value: String) -> Result<()> {
        let size = self.check_size(&key, &value)?;

        if let Some(&idx) = self.index.get(&key) {
            self.remove_at(idx);
        }
        self.insert_new(key, value, size);
        Ok(())
    }

    // == Put If Absent ==
    fn put_if_absent(&mut self, key: String, value: String) -> Result<()> {
        let size = self.check_size(&key, &value)?;

        if self.index.contains_key(&key) {
            trace!(key = key.as_str(), "put_if_absent on existing key");
            return Err(CacheError::KeyExists(key));
        }
        self.insert_new(key, value, size);
        Ok(())
    }

    // == Set ==
    /// Replaces the value of an existing key and marks it most recently used.
    ///
    /// Growing the value may evict other entries. The updated entry sits at
    /// the head while eviction runs, so it is never chosen itself.
    fn set(&mut self, key: String, value: String) -> Result<()> {
        self.check_size(&key, &value)?;

        let Some(&idx) = self.index.get(&key) else {
            return Err(CacheError::NotFound(key));
        };
        self.list.move_to_front(idx);

        let old_len = match self.list.get(idx) {
            Some(entry) => entry.value.len(),
            None => return Err(CacheError::Internal(format!("dangling index for {}", key))),
        };
        let new_len = value.len();
        if new_len > old_len {
            self.reserve(new_len - old_len);
        }

        if let Some(entry) = self.list.get_mut(idx) {
            self.free_bytes = self.free_bytes + old_len - new_len;
            entry.value = value;
        }
        Ok(())
    }

    // == Delete ==
    fn delete(&mut self, key: &str) -> Result<()> {
        match self.index.get(key) {
            Some(&idx) => {
                self.remove_at(idx);
                Ok(())
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks the entry most recently used.
    fn get(&mut self, key: &str) -> Result<String> {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        self.list.move_to_front(idx);
        match self.list.get(idx) {
            Some(entry) => {
                self.stats.record_hit();
                Ok(entry.value.clone())
            }
            None => Err(CacheError::Internal(format!("dangling index for {}", key))),
        }
    }
}
