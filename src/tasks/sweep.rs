//! Background Sweep Tasks
//!
//! Periodic maintenance passes that purge expired cache entries and lapsed
//! limiter windows, independent of request traffic. Each task runs in its
//! own tokio task on a fixed interval; a failure in one sweep cycle is
//! confined to that task and the next cycle runs normally.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::limiter::LimiterStore;

/// Spawns a background task that periodically sweeps the cache.
///
/// Each pass removes expired entries, then evicts least-recently-accessed
/// entries if the cache is over capacity. The write lock is acquired once
/// per pass and released before the next sleep.
///
/// # Arguments
/// * `store` - Shared cache store
/// * `sweep_interval_secs` - Interval in seconds between passes
///
/// # Returns
/// A JoinHandle used to abort the task during shutdown.
pub fn spawn_cache_sweep_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let outcome = {
                let mut store_guard = store.write().await;
                store_guard.sweep()
            };

            if outcome.expired_removed > 0 || outcome.evicted > 0 {
                info!(
                    "Cache sweep: removed {} expired entries, evicted {} over capacity",
                    outcome.expired_removed, outcome.evicted
                );
            } else {
                debug!("Cache sweep: nothing to remove");
            }
        }
    })
}

/// Spawns a background task that periodically purges lapsed limiter windows.
///
/// Without this, a limiter keyed on untrusted input (client addresses,
/// submitted identities) would grow with all-time key cardinality.
pub fn spawn_limiter_sweep_task(
    store: Arc<RwLock<LimiterStore>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting limiter sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store_guard = store.write().await;
                store_guard.sweep_lapsed()
            };

            if removed > 0 {
                info!("Limiter sweep: removed {} lapsed windows", removed);
            } else {
                debug!("Limiter sweep: no lapsed windows");
            }
        }
    })
}
