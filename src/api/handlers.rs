//! API Handlers
//!
//! HTTP request handlers for each protection-layer endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::error::{BackstopError, Result};
use crate::limiter::RateLimiter;
use crate::models::{
    ClearResponse, DeleteResponse, ExistsResponse, GetResponse, HealthResponse, InvalidateRequest,
    InvalidateResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Owns the cache and one rate limiter per admission class. Each component
/// carries its own background sweep; [`destroy`](AppState::destroy) tears
/// all of them down during graceful shutdown.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache for JSON payloads
    pub cache: Arc<MemoryCache<serde_json::Value>>,
    /// Admission class for all traffic
    pub general_limiter: Arc<RateLimiter>,
    /// Admission class for single-key writes (set/delete)
    pub write_limiter: Arc<RateLimiter>,
    /// Admission class for bulk operations (invalidate/clear)
    pub bulk_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates a new AppState from already-constructed components.
    pub fn new(
        cache: MemoryCache<serde_json::Value>,
        general_limiter: RateLimiter,
        write_limiter: RateLimiter,
        bulk_limiter: RateLimiter,
    ) -> Self {
        Self {
            cache: Arc::new(cache),
            general_limiter: Arc::new(general_limiter),
            write_limiter: Arc::new(write_limiter),
            bulk_limiter: Arc::new(bulk_limiter),
        }
    }

    /// Creates a new AppState from configuration, starting the background
    /// sweep of every component.
    ///
    /// Must be called within a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let cache = MemoryCache::with_sweeper(
            config.max_entries,
            config.default_ttl,
            config.sweep_interval,
        )?;
        let general_limiter = RateLimiter::with_sweeper(
            config.general_window_ms,
            config.general_max_requests,
            config.sweep_interval,
        )?;
        let write_limiter = RateLimiter::with_sweeper(
            config.write_window_ms,
            config.write_max_requests,
            config.sweep_interval,
        )?;
        let bulk_limiter = RateLimiter::with_sweeper(
            config.bulk_window_ms,
            config.bulk_max_requests,
            config.sweep_interval,
        )?;

        Ok(Self::new(cache, general_limiter, write_limiter, bulk_limiter))
    }

    /// Stops every background sweep and clears all component state.
    pub async fn destroy(&self) {
        self.cache.destroy().await;
        self.general_limiter.destroy().await;
        self.write_limiter.destroy().await;
        self.bulk_limiter.destroy().await;
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(BackstopError::InvalidRequest(error_msg));
    }

    state.cache.set(req.key.clone(), req.value, req.ttl).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key; 404 when absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(BackstopError::NotFound(key)),
    }
}

/// Handler for GET /has/:key
///
/// Existence check that leaves access statistics untouched.
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.has(&key).await;
    Json(ExistsResponse { key, exists })
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache; absence is reported, not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key).await;
    Json(DeleteResponse { key, deleted })
}

/// Handler for POST /invalidate
///
/// Deletes every key matching the submitted glob pattern.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.cache.invalidate_matching(&req.pattern).await?;

    Ok(Json(InvalidateResponse {
        pattern: req.pattern,
        removed,
    }))
}

/// Handler for POST /clear
///
/// Removes all cache entries unconditionally.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::new())
}

/// Handler for GET /stats
///
/// Returns the current cache statistics snapshot.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(
            MemoryCache::new(100, 300).unwrap(),
            RateLimiter::new(60_000, 100).unwrap(),
            RateLimiter::new(60_000, 100).unwrap(),
            RateLimiter::new(60_000, 100).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: serde_json::json!("test_value"),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.value, serde_json::json!("test_value"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(BackstopError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_has_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "present".to_string(),
            value: serde_json::json!(1),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = has_handler(State(state.clone()), Path("present".to_string())).await;
        assert!(response.exists);

        let response = has_handler(State(state), Path("absent".to_string())).await;
        assert!(!response.exists);
    }

    #[tokio::test]
    async fn test_delete_handler_reports_absence() {
        let state = test_state();

        let req = SetRequest {
            key: "to_delete".to_string(),
            value: serde_json::json!("value"),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(response.deleted);

        let response = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(!response.deleted);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = test_state();

        for key in ["store:42:a", "store:42:b", "store:7:a"] {
            let req = SetRequest {
                key: key.to_string(),
                value: serde_json::json!(1),
                ttl: None,
            };
            set_handler(State(state.clone()), Json(req)).await.unwrap();
        }

        let req = InvalidateRequest {
            pattern: "store:42:*".to_string(),
        };
        let response = invalidate_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(response.removed, 2);

        assert_eq!(state.cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_handler_rejects_empty_pattern() {
        let state = test_state();

        let req = InvalidateRequest {
            pattern: "".to_string(),
        };
        let result = invalidate_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(BackstopError::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "key1".to_string(),
            value: serde_json::json!(1),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        clear_handler(State(state.clone())).await;
        assert_eq!(state.cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.total_entries, 0);
        assert_eq!(response.max_size, 100);
        assert_eq!(response.total_hits, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let req = SetRequest {
            key: "".to_string(), // Empty key is invalid
            value: serde_json::json!("value"),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(result.is_err());
    }
}
