//! Capacity Evictor Module
//!
//! Strict least-recently-used eviction against a fixed entry count.

use tracing::debug;

use crate::cache::{CacheEntry, RecencyIndex};

// == Capacity Evictor ==
/// Keeps the recency index within a maximum number of entries.
#[derive(Debug, Clone, Copy)]
pub struct CapacityEvictor {
    /// Maximum number of entries, never zero
    capacity: usize,
}

impl CapacityEvictor {
    /// Creates an evictor for `capacity` entries. Zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Make Room ==
    /// Evicts the back-of-list entry if inserting `key` would exceed capacity.
    ///
    /// Keys that are already indexed are updates and never evict.
    pub fn make_room<V>(&self, index: &mut RecencyIndex<V>, key: &str) -> Option<CacheEntry<V>> {
        if index.contains(key) || index.len() < self.capacity {
            return None;
        }

        let evicted = index.pop_back()?;
        debug!(key = %evicted.key, "Evicted least recently used key");
        Some(evicted)
    }
}
