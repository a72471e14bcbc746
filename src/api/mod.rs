//! API Module
//!
//! HTTP handlers, admission middleware and routing for the protection-layer
//! REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /has/:key` - Existence check without touching access stats
//! - `DELETE /del/:key` - Delete a key
//! - `POST /invalidate` - Remove every key matching a glob pattern
//! - `POST /clear` - Remove all entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod ratelimit;
pub mod routes;

pub use handlers::*;
pub use ratelimit::{client_identity_key, client_key, rate_limit, KeyFn, RateLimitState};
pub use routes::create_router;
