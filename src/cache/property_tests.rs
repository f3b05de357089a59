//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against its size and ordering guarantees.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::SimpleLru;
use crate::error::CacheError;
use crate::storage::Storage;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 64;

// == Strategies ==
/// Small key alphabet so operations collide on the same keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

/// Values up to slightly above the budget, to exercise rejection
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,70}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    PutIfAbsent { key: String, value: String },
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::PutIfAbsent { key, value }),
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Straightforward LRU over a Vec, most recently used first.
struct ModelLru {
    entries: Vec<(String, String)>,
    max_size: usize,
}

impl ModelLru {
    fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    fn used(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn fits(&self, key: &str, value: &str) -> bool {
        key.len() + value.len() <= self.max_size
    }

    /// Evicts from the back until `extra` more bytes fit.
    fn make_room(&mut self, extra: usize) {
        while self.used() + extra > self.max_size {
            self.entries.pop();
        }
    }

    fn put(&mut self, key: &str, value: &str) -> bool {
        if !self.fits(key, value) {
            return false;
        }
        if let Some(pos) = self.position(key) {
            self.entries.remove(pos);
        }
        self.make_room(key.len() + value.len());
        self.entries.insert(0, (key.to_string(), value.to_string()));
        true
    }

    fn put_if_absent(&mut self, key: &str, value: &str) -> bool {
        if !self.fits(key, value) || self.position(key).is_some() {
            return false;
        }
        self.put(key, value)
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        if !self.fits(key, value) {
            return false;
        }
        let Some(pos) = self.position(key) else {
            return false;
        };
        let (k, old) = self.entries.remove(pos);
        self.entries.insert(0, (k, old.clone()));
        if value.len() > old.len() {
            // Head is excluded from eviction while the value grows
            while self.used() + value.len() - old.len() > self.max_size {
                self.entries.pop();
            }
        }
        self.entries[0].1 = value.to_string();
        true
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1.clone();
        self.entries.insert(0, entry);
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }
}

fn apply(store: &mut SimpleLru, op: &CacheOp) -> bool {
    match op.clone() {
        CacheOp::Put { key, value } => store.put(key, value).is_ok(),
        CacheOp::PutIfAbsent { key, value } => store.put_if_absent(key, value).is_ok(),
        CacheOp::Set { key, value } => store.set(key, value).is_ok(),
        CacheOp::Get { key } => store.get(&key).is_ok(),
        CacheOp::Delete { key } => store.delete(&key).is_ok(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations, stored bytes never exceed the budget and
    // the index and the recency list describe the same set of keys.
    #[test]
    fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let mut store = SimpleLru::new(TEST_MAX_SIZE);

        for op in &ops {
            apply(&mut store, op);
            store.check_invariants();
            prop_assert!(store.used_size() <= TEST_MAX_SIZE);
        }
    }

    // The store agrees with the reference model on every result, every
    // returned value and the full recency order.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let mut store = SimpleLru::new(TEST_MAX_SIZE);
        let mut model = ModelLru::new(TEST_MAX_SIZE);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    let expected = model.put(&key, &value);
                    prop_assert_eq!(store.put(key, value).is_ok(), expected);
                }
                CacheOp::PutIfAbsent { key, value } => {
                    let expected = model.put_if_absent(&key, &value);
                    prop_assert_eq!(store.put_if_absent(key, value).is_ok(), expected);
                }
                CacheOp::Set { key, value } => {
                    let expected = model.set(&key, &value);
                    prop_assert_eq!(store.set(key, value).is_ok(), expected);
                }
                CacheOp::Get { key } => {
                    let expected = model.get(&key);
                    prop_assert_eq!(store.get(&key).ok(), expected);
                }
                CacheOp::Delete { key } => {
                    let expected = model.delete(&key);
                    prop_assert_eq!(store.delete(&key).is_ok(), expected);
                }
            }
            prop_assert_eq!(store.keys_by_recency(), model.keys());
            prop_assert_eq!(store.used_size(), model.used());
        }
    }

    // An entry larger than the whole budget is refused by every insert path
    // and leaves the store exactly as it was.
    #[test]
    fn prop_oversized_rejection_is_idempotent(
        ops in prop::collection::vec(cache_op_strategy(), 0..30),
        key in key_strategy(),
        extra in 1usize..20
    ) {
        let mut store = SimpleLru::new(TEST_MAX_SIZE);
        for op in &ops {
            apply(&mut store, op);
        }
        let before = store.keys_by_recency();
        let used = store.used_size();

        let value = "x".repeat(TEST_MAX_SIZE + extra - key.len().min(TEST_MAX_SIZE));
        for _ in 0..2 {
            let too_large = |r: crate::error::Result<()>| {
                matches!(r, Err(CacheError::EntryTooLarge { .. }))
            };
            prop_assert!(too_large(store.put(key.clone(), value.clone())));
            prop_assert!(too_large(store.put_if_absent(key.clone(), value.clone())));
            prop_assert!(too_large(store.set(key.clone(), value.clone())));
        }

        prop_assert_eq!(store.keys_by_recency(), before);
        prop_assert_eq!(store.used_size(), used);
        store.check_invariants();
    }

    // PutIfAbsent twice on one key: first wins, second fails and changes nothing.
    #[test]
    fn prop_put_if_absent_first_wins(
        key in key_strategy(),
        first in "[a-z]{0,20}",
        second in "[a-z]{0,20}"
    ) {
        let mut store = SimpleLru::new(TEST_MAX_SIZE);

        prop_assert!(store.put_if_absent(key.clone(), first.clone()).is_ok());
        let result = store.put_if_absent(key.clone(), second);
        prop_assert_eq!(result, Err(CacheError::KeyExists(key.clone())));
        prop_assert_eq!(store.get(&key).unwrap(), first);
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With room for exactly N fixed-size entries, inserting one more evicts
    // the earliest inserted key.
    #[test]
    fn prop_lru_eviction_order(
        keys in prop::collection::hash_set("[a-z]{4}", 2..10),
        new_key in "[A-Z]{4}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        // Every entry costs 4 + 4 bytes
        let mut store = SimpleLru::new(keys.len() * 8);

        for key in &keys {
            store.put(key.clone(), "vvvv".to_string()).unwrap();
        }
        prop_assert_eq!(store.len(), keys.len());

        store.put(new_key.clone(), "vvvv".to_string()).unwrap();

        prop_assert_eq!(store.len(), keys.len());
        prop_assert!(!store.contains(&keys[0]), "oldest key should be evicted");
        prop_assert!(store.contains(&new_key));
        for key in keys.iter().skip(1) {
            prop_assert!(store.contains(key), "key '{}' should survive", key);
        }
    }

    // A Get on the least recently used key protects it from the next eviction.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::hash_set("[a-z]{4}", 3..8),
        new_key in "[A-Z]{4}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut store = SimpleLru::new(keys.len() * 8);

        for key in &keys {
            store.put(key.clone(), "vvvv".to_string()).unwrap();
        }

        let accessed = keys[0].clone();
        store.get(&accessed).unwrap();
        store.put(new_key.clone(), "vvvv".to_string()).unwrap();

        prop_assert!(store.contains(&accessed), "accessed key must not be evicted");
        prop_assert!(!store.contains(&keys[1]), "next oldest key should be evicted");
        prop_assert!(store.contains(&new_key));
    }

    // Keys reachable by walking the list are exactly the keys that Get finds.
    #[test]
    fn prop_index_and_list_agree(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = SimpleLru::new(TEST_MAX_SIZE);
        for op in &ops {
            apply(&mut store, op);
        }

        let listed: HashSet<String> = store.keys_by_recency().into_iter().collect();
        prop_assert_eq!(listed.len(), store.len());
        for key in &listed {
            prop_assert!(store.peek(key).is_some());
        }
    }
}
