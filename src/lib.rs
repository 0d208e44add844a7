//! LRU/TTL Cache - A bounded in-process key/value cache
//!
//! Reconciles capacity-based LRU eviction with absolute TTL expiration, and
//! exposes the cache over a small REST API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{CacheSettings, CacheStats, LruTtlCache};
pub use config::Config;
