//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired entries and enforces the LRU capacity bound
//! - Limiter sweep: purges lapsed rate-limit windows

mod sweep;

pub use sweep::{spawn_cache_sweep_task, spawn_limiter_sweep_task};
