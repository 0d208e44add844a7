//! Cache Façade Module
//!
//! Thread-safe handle over [`CacheStore`] that owns the expiration sweeper.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::{CacheSettings, CacheStats, CacheStore};
use crate::tasks::{spawn_sweeper, SweeperHandle};

// == Shared State ==
/// State behind every clone of an [`LruTtlCache`].
pub(crate) struct Shared<V> {
    /// Entries, recency order and counters under a single lock
    store: Mutex<CacheStore<V>>,
    /// Wakes the sweeper when keys were flagged for deferred removal
    wakeup: Arc<Notify>,
    settings: CacheSettings,
    /// Running sweeper, if any
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl<V: Clone> Shared<V> {
    /// Runs one full expiration sweep.
    pub(crate) fn purge_expired(&self) -> usize {
        self.store.lock().cleanup_expired()
    }

    /// Removes keys flagged during a full scan that are still stale.
    pub(crate) fn remove_pending(&self) -> usize {
        self.store.lock().remove_pending()
    }
}

impl<V> Drop for Shared<V> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            sweeper.cancel();
        }
    }
}

// == LRU/TTL Cache ==
/// Bounded key/value cache with LRU eviction and TTL expiration.
///
/// Cloning is cheap and every clone operates on the same entries. All
/// operations take one short lock and never wait on I/O while holding it.
pub struct LruTtlCache<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for LruTtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> std::fmt::Debug for LruTtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruTtlCache")
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl<V: Clone + Send + 'static> LruTtlCache<V> {
    // == Constructors ==
    /// Creates a cache without a background sweeper.
    ///
    /// Stale entries are still never served; they are removed when read or
    /// by [`LruTtlCache::purge_expired`].
    pub fn new(settings: CacheSettings) -> Self {
        let settings = settings.normalized();
        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(CacheStore::new(&settings)),
                wakeup: Arc::new(Notify::new()),
                settings,
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Creates a cache and starts its expiration sweeper on the current
    /// tokio runtime.
    ///
    /// The sweeper stops when `token` is cancelled, when
    /// [`LruTtlCache::shutdown`] is called, or when the last handle is dropped.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(settings: CacheSettings, token: CancellationToken) -> Self {
        let cache = Self::new(settings);
        let sweeper = spawn_sweeper(
            Arc::downgrade(&cache.shared),
            Arc::clone(&cache.shared.wakeup),
            cache.shared.settings.sweep_interval(),
            token,
        );
        *cache.shared.sweeper.lock() = Some(sweeper);
        cache
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A zero `ttl` stores an entry that is already stale.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.shared.store.lock().set(key.into(), value, ttl);
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        self.shared.store.lock().get(key)
    }

    // == Get All ==
    /// Returns a snapshot of every unexpired entry.
    ///
    /// Recency order is unchanged. Stale entries seen during the scan are
    /// handed to the sweeper for removal.
    pub fn get_all(&self) -> HashMap<String, V> {
        let (snapshot, flagged) = self.shared.store.lock().get_all();
        if flagged > 0 {
            self.shared.wakeup.notify_one();
        }
        snapshot
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.shared.store.lock().delete(key)
    }

    // == Delete All ==
    /// Removes every entry. Returns whether the cache held anything.
    pub fn delete_all(&self) -> bool {
        self.shared.store.lock().delete_all()
    }

    // == Maintenance ==
    /// Removes every stale entry now. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }

    /// Stops the sweeper and waits for it to exit. Later calls are no-ops.
    pub async fn shutdown(&self) {
        let sweeper = self.shared.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            sweeper.shutdown().await;
            info!("Cache sweeper shut down");
        }
    }

    // == Introspection ==
    /// Live keys from most to least recently used. Does not touch recency.
    pub fn keys(&self) -> Vec<String> {
        self.shared.store.lock().keys()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.store.lock().stats()
    }

    /// Number of stored entries, including stale ones not yet removed.
    pub fn len(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.shared.settings.capacity()
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.shared.settings
    }

    /// Whether a sweeper was started and has not been shut down.
    pub fn has_sweeper(&self) -> bool {
        self.shared.sweeper.lock().is_some()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.shared.store.lock().assert_consistent();
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.shared.store.lock().pending_len()
    }

    #[cfg(test)]
    pub(crate) fn sweeper_token(&self) -> Option<CancellationToken> {
        self.shared
            .sweeper
            .lock()
            .as_ref()
            .map(|sweeper| sweeper.token().clone())
    }
}
