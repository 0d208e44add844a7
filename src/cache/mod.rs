//! Cache Module
//!
//! Provides a bounded in-process cache with TTL expiration and LRU eviction.

mod entry;
mod eviction;
mod handle;
mod lru;
mod pending;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use eviction::CapacityEvictor;
pub use handle::LruTtlCache;
pub use lru::RecencyIndex;
pub use pending::PendingRemovals;
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use handle::Shared;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Shortest sweep period accepted
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

// == Cache Settings ==
/// Construction parameters for a cache instance.
///
/// Fields are only reachable through the constructors, which keep every
/// value usable: capacity and pending limit of at least one, and a sweep
/// interval of at least [`MIN_SWEEP_INTERVAL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of live entries
    capacity: usize,
    /// Period between full expiration sweeps
    sweep_interval: Duration,
    /// Maximum number of keys waiting for deferred removal
    pending_limit: usize,
}

impl CacheSettings {
    /// Creates settings with a pending limit equal to the capacity.
    ///
    /// A zero capacity is raised to one and the sweep interval is raised to
    /// [`MIN_SWEEP_INTERVAL`].
    pub fn new(capacity: usize, sweep_interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            sweep_interval: sweep_interval.max(MIN_SWEEP_INTERVAL),
            pending_limit: capacity,
        }
    }

    /// Overrides the pending removal limit.
    pub fn with_pending_limit(mut self, pending_limit: usize) -> Self {
        self.pending_limit = pending_limit.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn pending_limit(&self) -> usize {
        self.pending_limit
    }

    /// Re-applies the lower bounds of [`CacheSettings::new`].
    pub(crate) fn normalized(self) -> Self {
        Self {
            capacity: self.capacity.max(1),
            sweep_interval: self.sweep_interval.max(MIN_SWEEP_INTERVAL),
            pending_limit: self.pending_limit.max(1),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(1000, Duration::from_secs(1))
    }
}
