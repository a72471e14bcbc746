//! Cache Statistics Module
//!
//! Read-only diagnostic snapshot of the cache contents.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time cache statistics.
///
/// Produced by [`CacheStore::stats`](crate::cache::CacheStore::stats);
/// inspecting statistics never mutates the cache, so `expired_entries`
/// counts entries that are logically gone but not yet swept.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries, including expired-but-unswept ones
    pub total_entries: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Sum of per-entry hit counts
    pub total_hits: u64,
    /// Entries whose expiration has passed as of this snapshot
    pub expired_entries: usize,
    /// Estimated memory footprint in bytes (keys plus entry structs; heap
    /// owned by the values themselves is not counted)
    pub memory_usage: usize,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_hits, 0);
        assert_eq!(stats.expired_entries, 0);
        assert_eq!(stats.memory_usage, 0);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            total_entries: 3,
            max_size: 500,
            total_hits: 12,
            expired_entries: 1,
            memory_usage: 2048,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total_entries\":3"));
        assert!(json.contains("\"max_size\":500"));
        assert!(json.contains("\"total_hits\":12"));
        assert!(json.contains("\"expired_entries\":1"));
        assert!(json.contains("\"memory_usage\":2048"));
    }
}
