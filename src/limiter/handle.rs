//! Limiter Handle Module
//!
//! Wraps the synchronous [`LimiterStore`] in shared ownership plus the
//! lifecycle the admission middleware expects: a periodic sweep of lapsed
//! windows and a [`destroy`](RateLimiter::destroy) for shutdown.

use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::{BackstopError, Result};
use crate::limiter::{LimiterStore, RateDecision};
use crate::tasks::spawn_limiter_sweep_task;

// == Rate Limiter ==
/// Shared fixed-window rate limiter with an explicit lifecycle.
///
/// Distinct instances are fully independent; a server typically runs one per
/// admission class (general traffic, writes, bulk operations) with its own
/// window and quota.
#[derive(Debug)]
pub struct RateLimiter {
    /// Thread-safe limiter store
    store: Arc<RwLock<LimiterStore>>,
    /// Background sweep task, present until destroyed
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl RateLimiter {
    // == Constructors ==
    /// Creates a limiter without a background sweep.
    ///
    /// Lapsed windows are still reset correctly on the next request for
    /// their key; only unreferenced records accumulate until
    /// [`sweep_now`](Self::sweep_now) runs. Intended for tests.
    pub fn new(window_ms: u64, max_requests: u32) -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(LimiterStore::new(window_ms, max_requests)?)),
            sweeper: Mutex::new(None),
        })
    }

    /// Creates a limiter and starts its periodic sweep task.
    pub fn with_sweeper(
        window_ms: u64,
        max_requests: u32,
        sweep_interval_secs: u64,
    ) -> Result<Self> {
        if sweep_interval_secs == 0 {
            return Err(BackstopError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        let limiter = Self::new(window_ms, max_requests)?;
        let handle = spawn_limiter_sweep_task(limiter.store.clone(), sweep_interval_secs);
        *limiter.sweeper.lock().expect("sweeper lock poisoned") = Some(handle);
        Ok(limiter)
    }

    // == Admit ==
    /// Counts a request against `key` and returns the admission decision.
    pub async fn admit(&self, key: &str) -> RateDecision {
        self.store.write().await.check(key)
    }

    // == Tracked Keys ==
    /// Number of keys with live window records.
    pub async fn tracked_keys(&self) -> usize {
        self.store.read().await.len()
    }

    /// Runs a sweep immediately, independent of the background task.
    pub async fn sweep_now(&self) -> usize {
        self.store.write().await.sweep_lapsed()
    }

    // == Destroy ==
    /// Stops the background sweep and drops all window records.
    ///
    /// Safe to call more than once.
    pub async fn destroy(&self) {
        let handle = self.sweeper.lock().expect("sweeper lock poisoned").take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.store.write().await.clear();
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        if let Ok(slot) = self.sweeper.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_admit_and_reject() {
        let limiter = RateLimiter::new(60_000, 2).unwrap();

        assert!(limiter.admit("client-1").await.allowed);
        assert!(limiter.admit("client-1").await.allowed);

        let rejected = limiter.admit("client-1").await;
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let strict = RateLimiter::new(60_000, 1).unwrap();
        let lenient = RateLimiter::new(60_000, 100).unwrap();

        strict.admit("client-1").await;
        assert!(!strict.admit("client-1").await.allowed);

        // Same key, different limiter instance
        assert!(lenient.admit("client-1").await.allowed);
    }

    #[tokio::test]
    async fn test_sweeper_purges_lapsed_windows() {
        let limiter = RateLimiter::with_sweeper(200, 5, 1).unwrap();

        limiter.admit("client-1").await;
        limiter.admit("client-2").await;
        assert_eq!(limiter.tracked_keys().await, 2);

        // Windows lapse after 200ms; the sweep runs after 1s with no
        // further traffic for either key
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(limiter.tracked_keys().await, 0);
        limiter.destroy().await;
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let limiter = RateLimiter::with_sweeper(60_000, 5, 1).unwrap();

        limiter.admit("client-1").await;

        limiter.destroy().await;
        limiter.destroy().await;

        assert_eq!(limiter.tracked_keys().await, 0);
    }
}
