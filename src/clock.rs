//! Wall-Clock Source
//!
//! Both the cache and the rate limiter reason about time as epoch
//! milliseconds; this is the single place they obtain it from.

use std::time::{SystemTime, UNIX_EPOCH};

// == Current Timestamp ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
