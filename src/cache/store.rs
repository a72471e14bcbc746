//! Cache Store Module
//!
//! Main cache engine: HashMap storage with lazy TTL expiration and
//! sweep-time LRU capacity enforcement.

use std::collections::HashMap;
use std::mem;

use crate::cache::{CacheEntry, CacheStats, KeyPattern, MAX_KEY_LENGTH};
use crate::clock::current_timestamp_ms;
use crate::error::{BackstopError, Result};

// == Sweep Outcome ==
/// What a sweep pass removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOutcome {
    /// Entries removed because their TTL had elapsed
    pub expired_removed: usize,
    /// Entries evicted to bring the cache back to capacity
    pub evicted: usize,
}

// == Cache Store ==
/// Synchronous cache core with TTL expiration and LRU eviction.
///
/// Inserts never enforce capacity; the periodic sweep does. A burst of
/// inserts can therefore transiently exceed `max_entries` until the next
/// sweep, keeping `set` O(1) and amortizing eviction cost off the request
/// path.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Maximum number of entries enforced at sweep time
    max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    ///
    /// Both parameters must be non-zero.
    pub fn new(max_entries: usize, default_ttl: u64) -> Result<Self> {
        if max_entries == 0 {
            return Err(BackstopError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if default_ttl == 0 {
            return Err(BackstopError::InvalidConfig(
                "default_ttl must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            max_entries,
            default_ttl,
        })
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value is overwritten, the TTL is reset
    /// and the access statistics start over. No capacity check happens here;
    /// the next sweep restores the bound.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds (uses default_ttl if None)
    pub fn set(&mut self, key: String, value: V, ttl: Option<u64>) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(BackstopError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if ttl == Some(0) {
            return Err(BackstopError::InvalidRequest(
                "TTL must be greater than zero".to_string(),
            ));
        }

        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(value, effective_ttl));

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and unexpired, updating the entry's hit
    /// count and access timestamp. An entry found expired is removed as a
    /// side effect. A miss has no side effects.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if self.entries.get(key)?.is_expired() {
            self.entries.remove(key);
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch();
        Some(entry.value.clone())
    }

    // == Has ==
    /// Existence check with the same expiration semantics as `get`, without
    /// mutating the entry's access statistics.
    pub fn has(&mut self, key: &str) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return false,
        };

        if expired {
            self.entries.remove(key);
            return false;
        }
        true
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Returns the current number of entries, including entries that are
    /// logically expired but not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns a diagnostic snapshot of the cache contents.
    ///
    /// Read-only: expired entries are counted, not removed.
    pub fn stats(&self) -> CacheStats {
        let now = current_timestamp_ms();
        let total_hits = self.entries.values().map(|e| e.hit_count).sum();
        let expired_entries = self
            .entries
            .values()
            .filter(|e| e.expires_at <= now)
            .count();
        let memory_usage = self.entries.keys().map(|k| k.len()).sum::<usize>()
            + self.entries.len() * mem::size_of::<CacheEntry<V>>();

        CacheStats {
            total_entries: self.entries.len(),
            max_size: self.max_entries,
            total_hits,
            expired_entries,
            memory_usage,
        }
    }

    // == Invalidate Matching ==
    /// Deletes every key matching a glob pattern (`*` as wildcard).
    ///
    /// Returns the number of keys removed. A malformed pattern fails fast
    /// rather than silently matching nothing.
    pub fn invalidate_matching(&mut self, pattern: &str) -> Result<usize> {
        let compiled = KeyPattern::compile(pattern)?;

        let matching_keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| compiled.matches(key))
            .cloned()
            .collect();

        let count = matching_keys.len();
        for key in matching_keys {
            self.entries.remove(&key);
        }

        Ok(count)
    }

    // == Sweep ==
    /// Two-phase maintenance pass.
    ///
    /// Phase 1 removes every expired entry. Phase 2, if the cache is still
    /// over capacity, evicts the oldest-accessed entries until the count
    /// equals `max_entries`. Keys are collected before any removal so the
    /// caller's lock is held only for bounded batch deletes.
    pub fn sweep(&mut self) -> SweepOutcome {
        let now = current_timestamp_ms();
        let mut outcome = SweepOutcome::default();

        // Phase 1: expired entries
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        outcome.expired_removed = expired_keys.len();
        for key in expired_keys {
            self.entries.remove(&key);
        }

        // Phase 2: LRU eviction down to capacity
        if self.entries.len() > self.max_entries {
            let mut by_access: Vec<(String, u64)> = self
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.last_accessed_at))
                .collect();
            by_access.sort_by_key(|(_, accessed)| *accessed);

            let excess = self.entries.len() - self.max_entries;
            for (key, _) in by_access.into_iter().take(excess) {
                self.entries.remove(&key);
                outcome.evicted += 1;
            }
        }

        outcome
    }
}
