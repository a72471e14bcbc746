//! API Routes
//!
//! Configures the Axum router with all protection-layer endpoints and their
//! admission classes.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, has_handler, health_handler, invalidate_handler,
    set_handler, stats_handler, AppState,
};
use super::ratelimit::{client_identity_key, rate_limit, RateLimitState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `GET /has/:key` - Existence check without touching access stats
/// - `DELETE /del/:key` - Delete a key
/// - `POST /invalidate` - Remove every key matching a glob pattern
/// - `POST /clear` - Remove all entries
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Admission classes
/// - general: every route, keyed by client address
/// - write: `/set` and `/del`, keyed by address + submitted identity
/// - bulk: `/invalidate` and `/clear`, keyed by client address
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let general = RateLimitState::new(state.general_limiter.clone());
    let write = RateLimitState::with_key_fn(
        state.write_limiter.clone(),
        Arc::new(client_identity_key),
    );
    let bulk = RateLimitState::new(state.bulk_limiter.clone());

    let write_routes = Router::new()
        .route("/set", put(set_handler))
        .route("/del/:key", delete(delete_handler))
        .route_layer(middleware::from_fn_with_state(write, rate_limit));

    let bulk_routes = Router::new()
        .route("/invalidate", post(invalidate_handler))
        .route("/clear", post(clear_handler))
        .route_layer(middleware::from_fn_with_state(bulk, rate_limit));

    // Build router with all endpoints
    Router::new()
        .route("/get/:key", get(get_handler))
        .route("/has/:key", get(has_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .merge(write_routes)
        .merge(bulk_routes)
        .layer(middleware::from_fn_with_state(general, rate_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
