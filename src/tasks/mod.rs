//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Expiration Sweeper: removes stale entries periodically and on demand

mod sweeper;

pub(crate) use sweeper::{spawn_sweeper, SweeperHandle};
