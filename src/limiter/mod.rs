//! Rate Limiter Module
//!
//! Fixed-window request admission with per-key quotas and periodic sweep of
//! lapsed windows.

mod handle;
mod store;
mod window;


// Re-export public types
pub use handle::RateLimiter;
pub use store::{LimiterStore, RateDecision};
pub use window::WindowRecord;
