//! Cache Entry Module
//!
//! Defines the record stored for each key, with an absolute expiration instant.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiration instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value, opaque to the cache
    pub value: V,
    /// Absolute expiration instant, None = the clock cannot represent it
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` after `now`.
    ///
    /// A zero `ttl` produces an entry that is already stale.
    pub fn new(key: String, value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            key,
            value,
            expires_at: expiration_after(now, ttl),
        }
    }

    // == Refresh ==
    /// Overwrites the value and recomputes the expiration instant in place.
    pub fn refresh(&mut self, value: V, ttl: Duration, now: Instant) {
        self.value = value;
        self.expires_at = expiration_after(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// Boundary condition: an entry is stale once `now >= expires_at`, so a
    /// zero TTL is stale immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry is stale right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry is stale
    /// - `Some(remaining)` if the entry is still live
    /// - `None` if the entry has no expiration instant
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Utility Functions ==
/// Computes `now + ttl`, or None when the sum overflows the monotonic clock.
fn expiration_after(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("k".to_string(), "v", Duration::from_secs(60), Instant::now());

        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, "v");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("k".to_string(), 1u32, Duration::from_millis(50), Instant::now());

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_stale_immediately() {
        let now = Instant::now();
        let entry = CacheEntry::new("k".to_string(), (), Duration::ZERO, now);

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let entry = CacheEntry::new("k".to_string(), (), Duration::MAX, Instant::now());

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_refresh_overwrites_in_place() {
        let now = Instant::now();
        let mut entry = CacheEntry::new("k".to_string(), "old", Duration::ZERO, now);
        assert!(entry.is_expired_at(now));

        entry.refresh("new", Duration::from_secs(10), now);

        assert_eq!(entry.value, "new");
        assert!(!entry.is_expired_at(now));
        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }
}
