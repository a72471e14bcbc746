//! Limiter Store Module
//!
//! Fixed-window admission engine: a counter per key, reset at each window
//! boundary, swept once the window lapses.

use std::collections::HashMap;

use crate::clock::current_timestamp_ms;
use crate::error::{BackstopError, Result};
use crate::limiter::WindowRecord;

// == Rate Decision ==
/// Outcome of one admission check.
///
/// Rejection is a normal outcome, not an error; the caller translates it
/// into a throttling response and surfaces the quota metadata as headers.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Configured requests-per-window quota
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window rolls over (Unix milliseconds)
    pub reset_at: u64,
    /// Seconds until retry is worthwhile; set only on rejection
    pub retry_after_secs: Option<u64>,
}

// == Limiter Store ==
/// Synchronous fixed-window limiter core.
#[derive(Debug)]
pub struct LimiterStore {
    /// Per-key window records
    records: HashMap<String, WindowRecord>,
    /// Window length in milliseconds
    window_ms: u64,
    /// Requests allowed per window
    max_requests: u32,
}

impl LimiterStore {
    // == Constructor ==
    /// Creates a limiter store. Window length and quota must be non-zero.
    pub fn new(window_ms: u64, max_requests: u32) -> Result<Self> {
        if window_ms == 0 {
            return Err(BackstopError::InvalidConfig(
                "window_ms must be greater than zero".to_string(),
            ));
        }
        if max_requests == 0 {
            return Err(BackstopError::InvalidConfig(
                "max_requests must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            records: HashMap::new(),
            window_ms,
            max_requests,
        })
    }

    // == Check ==
    /// Counts a request against `key` and decides admission.
    ///
    /// A first request for a key, or one arriving after the window boundary,
    /// opens a fresh window with `count = 1`. Within a window, requests are
    /// admitted while `count < max_requests`; once the quota is spent,
    /// further requests are rejected without incrementing the counter.
    pub fn check(&mut self, key: &str) -> RateDecision {
        let now = current_timestamp_ms();
        let max_requests = self.max_requests;

        if let Some(record) = self.records.get_mut(key) {
            if !record.has_lapsed(now) {
                return if record.count < max_requests {
                    record.count += 1;
                    RateDecision {
                        allowed: true,
                        limit: max_requests,
                        remaining: max_requests - record.count,
                        reset_at: record.reset_at,
                        retry_after_secs: None,
                    }
                } else {
                    // Quota spent; reset_at is in the future here
                    let retry_after_secs = (record.reset_at - now + 999) / 1000;
                    RateDecision {
                        allowed: false,
                        limit: max_requests,
                        remaining: 0,
                        reset_at: record.reset_at,
                        retry_after_secs: Some(retry_after_secs),
                    }
                };
            }
        }

        // First request for this key, or its window has lapsed
        let record = WindowRecord::open(now, self.window_ms);
        let reset_at = record.reset_at;
        self.records.insert(key.to_string(), record);

        RateDecision {
            allowed: true,
            limit: max_requests,
            remaining: max_requests - 1,
            reset_at,
            retry_after_secs: None,
        }
    }

    // == Sweep Lapsed ==
    /// Removes every record whose window has lapsed.
    ///
    /// Keeps memory bounded by recently-active keys rather than all-time key
    /// cardinality, which matters when keys derive from untrusted input.
    pub fn sweep_lapsed(&mut self) -> usize {
        let now = current_timestamp_ms();

        let lapsed_keys: Vec<String> = self
            .records
            .iter()
            .filter(|(_, record)| record.has_lapsed(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = lapsed_keys.len();
        for key in lapsed_keys {
            self.records.remove(&key);
        }

        count
    }

    // == Length ==
    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // == Clear ==
    /// Drops all window records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
