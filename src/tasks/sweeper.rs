//! Expiration Sweeper Task
//!
//! Background task that removes stale cache entries, either on a fixed
//! period or when a full scan flagged keys for deferred removal.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::Shared;

// == Sweeper Handle ==
/// Owner side of a running sweeper.
pub(crate) struct SweeperHandle {
    /// Child of the token passed at construction
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop without waiting for it.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    /// Signals the sweeper to stop and waits for the loop to exit.
    pub(crate) async fn shutdown(self) {
        self.token.cancel();
        if let Err(err) = self.task.await {
            if err.is_panic() {
                warn!(error = %err, "Expiration sweeper panicked");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Spawns the expiration sweeper for a cache.
///
/// The loop wakes on three conditions:
/// - `token` (or its parent) is cancelled: the loop exits
/// - the `interval` timer fires: every stale entry is removed
/// - `wakeup` is notified: keys flagged during a full scan are removed
///
/// Only a weak reference to the cache is held, so the loop also exits once
/// every cache handle has been dropped.
pub(crate) fn spawn_sweeper<V>(
    shared: Weak<Shared<V>>,
    wakeup: Arc<Notify>,
    interval: Duration,
    token: CancellationToken,
) -> SweeperHandle
where
    V: Clone + Send + 'static,
{
    let token = token.child_token();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        info!(
            "Starting expiration sweeper with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = cancelled.cancelled() => break,

                _ = ticker.tick() => {
                    let Some(shared) = shared.upgrade() else { break };
                    let removed = shared.purge_expired();
                    drop(shared);

                    if removed > 0 {
                        info!("Expiration sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiration sweep: no expired entries found");
                    }
                }

                _ = wakeup.notified() => {
                    let Some(shared) = shared.upgrade() else { break };
                    let removed = shared.remove_pending();
                    drop(shared);

                    debug!("Deferred removal: removed {} flagged entries", removed);
                }
            }
        }

        info!("Expiration sweeper stopped");
    });

    SweeperHandle { token, task }
}
