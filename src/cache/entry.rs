//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support and
//! per-entry access statistics.

use crate::clock::current_timestamp_ms;

// == Cache Entry ==
/// A single cache entry: the stored value plus the metadata the expiration
/// and eviction policies operate on.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Number of successful reads of this entry
    pub hit_count: u64,
    /// Timestamp of the most recent successful read, or of insertion if the
    /// entry has never been read (Unix milliseconds); LRU ordering key
    pub last_accessed_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    pub fn new(value: V, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            expires_at: now + ttl_seconds * 1000,
            hit_count: 0,
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// time is greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Touch ==
    /// Records a successful read: bumps the hit counter and refreshes the
    /// access timestamp.
    pub fn touch(&mut self) {
        self.hit_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", 60);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.hit_count, 0);
        assert!(!entry.is_expired());
        assert!(entry.expires_at > entry.last_accessed_at);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", 1);

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "test",
            expires_at: now, // Expires exactly at creation time
            hit_count: 0,
            last_accessed_at: now,
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_touch_updates_statistics() {
        let mut entry = CacheEntry::new(42u32, 60);
        let initial_access = entry.last_accessed_at;

        sleep(Duration::from_millis(20));
        entry.touch();

        assert_eq!(entry.hit_count, 1);
        assert!(entry.last_accessed_at > initial_access);

        entry.touch();
        assert_eq!(entry.hit_count, 2);
    }
}
