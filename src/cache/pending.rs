//! Pending Removal Module
//!
//! Bounded set of keys observed stale during a full scan, waiting for the
//! sweeper to remove them.

use std::collections::{HashSet, VecDeque};

use tracing::warn;

// == Pending Removals ==
/// FIFO set of flagged keys with a fixed upper bound.
///
/// When full, flagging a new key drops the oldest flag. Dropped keys are
/// still caught by the next periodic sweep.
#[derive(Debug)]
pub struct PendingRemovals {
    /// Flag order, oldest first
    order: VecDeque<String>,
    /// Membership for de-duplication
    members: HashSet<String>,
    /// Maximum number of flags held, never zero
    limit: usize,
    /// Flags discarded because the set was full
    dropped: u64,
}

impl PendingRemovals {
    /// Creates an empty set holding at most `limit` keys. Zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    // == Flag ==
    /// Flags `key` for removal. Returns false if it was already flagged.
    pub fn flag(&mut self, key: &str) -> bool {
        if self.members.contains(key) {
            return false;
        }

        if self.order.len() >= self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
                self.dropped += 1;
                warn!(key = %oldest, limit = self.limit, "Pending removal set full, dropped oldest flag");
            }
        }

        self.order.push_back(key.to_string());
        self.members.insert(key.to_string());
        true
    }

    // == Drain ==
    /// Takes every flagged key, oldest first, leaving the set empty.
    pub fn drain(&mut self) -> Vec<String> {
        self.members.clear();
        self.order.drain(..).collect()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Number of flags discarded by the overflow policy so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
