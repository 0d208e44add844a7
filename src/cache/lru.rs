//! Recency Index Module
//!
//! Doubly-linked recency ordering of live entries, stored in an arena and
//! addressed by integer handles, paired with a key -> handle lookup.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Slot ==
/// Arena cell holding one entry and its neighbours in the recency list.
#[derive(Debug)]
struct Slot<V> {
    /// None while the slot sits on the free list
    entry: Option<CacheEntry<V>>,
    /// Neighbour closer to the front (more recently touched)
    prev: Option<usize>,
    /// Neighbour closer to the back (less recently touched)
    next: Option<usize>,
}

// == Recency Index ==
/// Tracks entries by recency of use with O(1) promotion and removal.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Every key in the lookup owns exactly one linked slot, and every linked
/// slot is reachable through the lookup.
#[derive(Debug)]
pub struct RecencyIndex<V> {
    /// Entry storage, addressed by handle
    slots: Vec<Slot<V>>,
    /// Handles of vacant slots available for reuse
    free: Vec<usize>,
    /// Key -> handle
    lookup: HashMap<String, usize>,
    /// Most recently used handle
    head: Option<usize>,
    /// Least recently used handle
    tail: Option<usize>,
}

impl<V> Default for RecencyIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyIndex<V> {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            lookup: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    // == Length ==
    /// Returns the number of indexed entries.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    // == Lookup ==
    /// Returns the entry for `key` without changing its recency.
    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        let idx = *self.lookup.get(key)?;
        self.slots[idx].entry.as_ref()
    }

    /// Returns the entry for `key` mutably without changing its recency.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        let idx = *self.lookup.get(key)?;
        self.slots[idx].entry.as_mut()
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    ///
    /// Returns false if the key is not tracked.
    pub fn touch(&mut self, key: &str) -> bool {
        match self.lookup.get(key) {
            Some(&idx) => {
                self.unlink(idx);
                self.link_front(idx);
                true
            }
            None => false,
        }
    }

    // == Push Front ==
    /// Inserts an entry at the front.
    ///
    /// If the key is already tracked, its entry is replaced in place and
    /// promoted instead of allocating a second slot.
    pub fn push_front(&mut self, entry: CacheEntry<V>) {
        if let Some(&idx) = self.lookup.get(&entry.key) {
            self.slots[idx].entry = Some(entry);
            self.unlink(idx);
            self.link_front(idx);
            return;
        }

        let key = entry.key.clone();
        let idx = self.allocate(entry);
        self.link_front(idx);
        self.lookup.insert(key, idx);
    }

    // == Remove ==
    /// Removes a key from the index, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let idx = self.lookup.remove(key)?;
        self.unlink(idx);
        self.release(idx)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the index is empty.
    pub fn pop_back(&mut self) -> Option<CacheEntry<V>> {
        let idx = self.tail?;
        self.unlink(idx);
        let entry = self.release(idx)?;
        self.lookup.remove(&entry.key);
        Some(entry)
    }

    // == Peek Back ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<&CacheEntry<V>> {
        self.tail.and_then(|idx| self.slots[idx].entry.as_ref())
    }

    // == Clear ==
    /// Drops every entry and resets the index to empty.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    // == Iterate ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            index: self,
            cursor: self.head,
        }
    }

    // == Arena Helpers ==
    fn allocate(&mut self, entry: CacheEntry<V>) -> usize {
        let slot = Slot {
            entry: Some(entry),
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<CacheEntry<V>> {
        let entry = self.slots[idx].entry.take();
        self.free.push(idx);
        entry
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;
        match self.head {
            Some(old_head) => self.slots[old_head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev.take();
        let next = self.slots[idx].next.take();

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Walks the list both ways and panics if links and lookup disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let slot = &self.slots[idx];
            assert_eq!(slot.prev, prev, "broken back-link at slot {idx}");
            let entry = slot.entry.as_ref().expect("linked slot must hold an entry");
            assert!(seen.insert(entry.key.clone()), "key {} linked twice", entry.key);
            assert_eq!(self.lookup.get(&entry.key), Some(&idx), "lookup disagrees for {}", entry.key);
            prev = Some(idx);
            cursor = slot.next;
        }
        assert_eq!(self.tail, prev, "tail does not match last linked slot");
        assert_eq!(seen.len(), self.lookup.len(), "lookup holds unlinked keys");
        assert_eq!(self.slots.len() - self.free.len(), self.lookup.len());
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyIndex`].
pub struct Iter<'a, V> {
    index: &'a RecencyIndex<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a CacheEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.index.slots[idx];
        self.cursor = slot.next;
        slot.entry.as_ref()
    }
}
