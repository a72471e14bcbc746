//! Backstop - an in-process resource-protection layer
//!
//! Provides a bounded TTL/LRU cache and fixed-window rate limiting, plus a
//! small HTTP facade demonstrating how a request-handling layer consumes
//! both.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::MemoryCache;
pub use config::Config;
pub use error::BackstopError;
pub use limiter::{RateDecision, RateLimiter};
pub use tasks::{spawn_cache_sweep_task, spawn_limiter_sweep_task};
