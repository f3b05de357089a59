//! Recency List Module
//!
//! Doubly-linked recency order stored in an arena of slots.

use crate::cache::entry::{Entry, NIL};

// == Recency List ==
/// Owns every cache entry and keeps them ordered by recency.
///
/// Entries live in `slots` and are addressed by stable slot indices. Links
/// between entries are slot indices as well, so nothing outside the list
/// ever borrows an entry. Vacated slots are recycled through `free`.
///
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct RecencyList {
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `entry` as the new head and returns its slot index.
    pub fn push_front(&mut self, entry: Entry) -> usize {
        let idx = self.allocate(entry);
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Unlink ==
    /// Detaches the entry at `idx` from the chain, repairing its neighbours
    /// and the head/tail markers. The entry keeps its slot.
    ///
    /// Does nothing if `idx` is vacant or already detached.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.get(idx) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        // A detached entry has no back-link and is not the head
        if prev == NIL && self.head != idx {
            return;
        }

        if prev == NIL {
            self.head = next;
        } else if let Some(entry) = self.slot_mut(prev) {
            entry.next = next;
        }

        if next == NIL {
            self.tail = prev;
        } else if let Some(entry) = self.slot_mut(next) {
            entry.prev = prev;
        }

        if let Some(entry) = self.slot_mut(idx) {
            entry.prev = NIL;
            entry.next = NIL;
        }
    }

    // == Move To Front ==
    /// Marks the entry at `idx` as most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == idx || self.get(idx).is_none() {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks the entry at `idx` and releases its slot.
    pub fn remove(&mut self, idx: usize) -> Option<Entry> {
        self.get(idx)?;
        self.unlink(idx);
        let entry = self.slots[idx].take();
        self.free.push(idx);
        self.len -= 1;
        entry
    }

    // == Evict Tail ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn evict_tail(&mut self) -> Option<Entry> {
        if self.tail == NIL {
            return None;
        }
        self.remove(self.tail)
    }

    // == Accessors ==
    /// Returns the entry stored at `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Returns the entry stored at `idx` mutably, if any.
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        self.slot_mut(idx)
    }

    /// Slot index of the most recently used entry.
    pub fn head(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    /// Slot index of the least recently used entry.
    pub fn tail(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Internals ==
    fn slot_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn allocate(&mut self, entry: Entry) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    /// Links a detached, occupied slot in as the new head.
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(entry) = self.slot_mut(idx) {
            entry.prev = NIL;
            entry.next = old_head;
        }

        if old_head == NIL {
            self.tail = idx;
        } else if let Some(entry) = self.slot_mut(old_head) {
            entry.prev = idx;
        }
        self.head = idx;
    }
}

// == Iterator ==
/// Head-to-tail iterator over a [`RecencyList`].
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor)?;
        self.cursor = entry.next;
        Some(entry)
    }
}
