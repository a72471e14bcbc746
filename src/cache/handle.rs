//! Cache Handle Module
//!
//! Wraps the synchronous [`CacheStore`] in the shared ownership and lifecycle
//! expected by the request-handling layer: an `Arc<RwLock<_>>` around the
//! store plus an optional background sweep task, torn down by [`destroy`].
//!
//! [`destroy`]: MemoryCache::destroy

use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::cache::{CacheStats, CacheStore, SweepOutcome};
use crate::error::{BackstopError, Result};
use crate::tasks::spawn_cache_sweep_task;

// == Memory Cache ==
/// Shared, bounded TTL/LRU cache with an explicit lifecycle.
///
/// Construct one per owner (test, server, worker), use it, then call
/// [`destroy`](Self::destroy) during shutdown so the sweep task does not keep
/// the process alive. The store is never exposed by reference; all access
/// goes through these methods.
#[derive(Debug)]
pub struct MemoryCache<V> {
    /// Thread-safe cache store
    store: Arc<RwLock<CacheStore<V>>>,
    /// Background sweep task, present until destroyed
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V: Clone + Send + Sync + 'static> MemoryCache<V> {
    // == Constructors ==
    /// Creates a cache without a background sweep.
    ///
    /// Expiration still happens lazily on reads; capacity is only enforced
    /// when [`sweep_now`](Self::sweep_now) is called. Intended for tests and
    /// embedders that drive the sweep themselves.
    pub fn new(max_entries: usize, default_ttl: u64) -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, default_ttl)?)),
            sweeper: Mutex::new(None),
        })
    }

    /// Creates a cache and starts its periodic sweep task.
    pub fn with_sweeper(
        max_entries: usize,
        default_ttl: u64,
        sweep_interval_secs: u64,
    ) -> Result<Self> {
        if sweep_interval_secs == 0 {
            return Err(BackstopError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        let cache = Self::new(max_entries, default_ttl)?;
        let handle = spawn_cache_sweep_task(cache.store.clone(), sweep_interval_secs);
        *cache.sweeper.lock().expect("sweeper lock poisoned") = Some(handle);
        Ok(cache)
    }

    // == Operations ==
    /// Retrieves a value, updating the entry's access statistics.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    /// Stores a key-value pair with optional TTL in seconds.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<u64>) -> Result<()> {
        self.store.write().await.set(key.into(), value, ttl)
    }

    /// Existence check without mutating access statistics.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    /// Removes an entry; returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Current entry count, including expired-but-unswept entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Diagnostic snapshot.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Deletes every key matching the glob pattern; returns the count.
    pub async fn invalidate_matching(&self, pattern: &str) -> Result<usize> {
        self.store.write().await.invalidate_matching(pattern)
    }

    /// Runs a sweep immediately, independent of the background task.
    pub async fn sweep_now(&self) -> SweepOutcome {
        self.store.write().await.sweep()
    }

    // == Destroy ==
    /// Stops the background sweep and clears all state.
    ///
    /// Safe to call more than once; subsequent calls are no-ops apart from
    /// re-clearing an already empty store.
    pub async fn destroy(&self) {
        let handle = self.sweeper.lock().expect("sweeper lock poisoned").take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.store.write().await.clear();
    }
}

impl<V> Drop for MemoryCache<V> {
    fn drop(&mut self) {
        // A dropped-but-not-destroyed cache must not leave its sweep task
        // holding the store alive
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
    async fn test_handle_set_get_roundtrip() {
        let cache: MemoryCache<String> = MemoryCache::new(100, 300).unwrap();

        cache.set("key1", "value1".to_string(), None).await.unwrap();

        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert_eq!(cache.len().await, 1);
        assert!(cache.has("key1").await);
    }

    #[tokio::test]
    async fn test_handle_rejects_zero_sweep_interval() {
        let result = MemoryCache::<String>::with_sweeper(100, 300, 0);
        assert!(matches!(result, Err(BackstopError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let cache: MemoryCache<String> = MemoryCache::with_sweeper(100, 300, 1).unwrap();

        cache.set("expire_soon", "value".to_string(), Some(1)).await.unwrap();

        // Wait for the entry to expire and the sweep to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(cache.len().await, 0);
        cache.destroy().await;
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let cache: MemoryCache<String> = MemoryCache::with_sweeper(100, 300, 1).unwrap();

        cache.set("long_lived", "value".to_string(), Some(3600)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived").await, Some("value".to_string()));
        cache.destroy().await;
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let cache: MemoryCache<String> = MemoryCache::with_sweeper(100, 300, 1).unwrap();

        cache.set("key1", "value1".to_string(), None).await.unwrap();

        cache.destroy().await;
        cache.destroy().await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_destroyed_cache_remains_usable_but_inert() {
        let cache: MemoryCache<String> = MemoryCache::with_sweeper(100, 300, 1).unwrap();
        cache.destroy().await;

        // No background activity remains, but calls still behave
        cache.set("key1", "value1".to_string(), None).await.unwrap();
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
    }
}
