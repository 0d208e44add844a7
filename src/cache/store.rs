//! Cache Store Module
//!
//! Unsynchronized cache state combining the recency index, capacity eviction,
//! TTL expiration and deferred removals. The façade wraps it in a lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheSettings, CacheStats, CapacityEvictor, PendingRemovals, RecencyIndex,
};

// == Cache Store ==
/// Cache state with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Entries in recency order
    index: RecencyIndex<V>,
    /// Capacity enforcement
    evictor: CapacityEvictor,
    /// Keys flagged stale during a full scan
    pending: PendingRemovals,
    /// Performance statistics
    stats: CacheStats,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the capacity and pending limit of `settings`.
    pub fn new(settings: &CacheSettings) -> Self {
        let evictor = CapacityEvictor::new(settings.capacity());
        Self {
            index: RecencyIndex::with_capacity(evictor.capacity()),
            evictor,
            pending: PendingRemovals::new(settings.pending_limit()),
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores a key-value pair that expires `ttl` from now.
    ///
    /// An existing key is updated in place and promoted without eviction.
    /// A new key at capacity first evicts the least recently used entry.
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        let now = Instant::now();

        if let Some(entry) = self.index.get_mut(&key) {
            entry.refresh(value, ttl, now);
            self.index.touch(&key);
            debug!(key = %key, ?ttl, "Updated key");
            return;
        }

        if self.evictor.make_room(&mut self.index, &key).is_some() {
            self.stats.record_eviction();
        }

        debug!(key = %key, ?ttl, "Set key");
        self.index.push_front(CacheEntry::new(key, value, ttl, now));
        self.stats.set_total_entries(self.index.len());
    }

    // == Get ==
    /// Retrieves a value by key and promotes it to most recently used.
    ///
    /// A stale entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.index.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.index.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.index.len());
            debug!(key = %key, "Get found expired key");
            return None;
        }

        self.index.touch(key);
        self.stats.record_hit();
        self.index.get(key).map(|entry| entry.value.clone())
    }

    // == Get All ==
    /// Returns every unexpired entry without changing recency order.
    ///
    /// Stale entries are left in place and flagged for deferred removal.
    /// Returns the snapshot together with the number of keys newly flagged.
    pub fn get_all(&mut self) -> (HashMap<String, V>, usize) {
        let now = Instant::now();
        let mut snapshot = HashMap::with_capacity(self.index.len());
        let mut flagged = 0;

        for entry in self.index.iter() {
            if entry.is_expired_at(now) {
                if self.pending.flag(&entry.key) {
                    flagged += 1;
                }
            } else {
                snapshot.insert(entry.key.clone(), entry.value.clone());
            }
        }

        (snapshot, flagged)
    }

    // == Delete ==
    /// Removes an entry by key whether or not it is stale.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.index.remove(key).is_some() {
            self.stats.set_total_entries(self.index.len());
            debug!(key = %key, "Deleted key");
            true
        } else {
            false
        }
    }

    // == Delete All ==
    /// Removes every entry. Returns false if the store was already empty.
    pub fn delete_all(&mut self) -> bool {
        self.pending.clear();
        if self.index.is_empty() {
            return false;
        }

        self.index.clear();
        self.stats.set_total_entries(0);
        debug!("Deleted all keys");
        true
    }

    // == Cleanup Expired ==
    /// Removes all stale entries from the cache and clears pending flags.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .index
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired_keys {
            self.index.remove(key);
        }
        self.pending.clear();

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.index.len());
        expired_keys.len()
    }

    // == Remove Pending ==
    /// Removes the flagged keys that are still stale.
    ///
    /// A flagged key that was refreshed since being flagged is kept.
    /// Returns the number of entries removed.
    pub fn remove_pending(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        for key in self.pending.drain() {
            let still_expired = self
                .index
                .get(&key)
                .is_some_and(|entry| entry.is_expired_at(now));
            if still_expired {
                self.index.remove(&key);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.index.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats.dropped_flags = self.pending.dropped();
        stats
    }

    /// Keys from most to least recently used, stale ones excluded.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.index
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Number of keys waiting for deferred removal.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including stale ones not yet removed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.evictor.capacity()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.index.assert_consistent();
        assert!(self.index.len() <= self.evictor.capacity());
    }
}
