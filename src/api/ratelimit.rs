//! Admission Middleware
//!
//! Bridges the rate limiter into the HTTP layer: derives a limiter key from
//! the request, asks the limiter for a decision, and translates the outcome
//! into quota headers or a 429 response. The limiter itself stays
//! framework-free; everything HTTP-specific lives here.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::TimeZone;

use crate::limiter::{RateDecision, RateLimiter};
use crate::models::ThrottledResponse;

// == Key Derivation ==
/// Derives a limiter key from an incoming request.
pub type KeyFn = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// Default key: the client address.
///
/// Prefers the first hop of `x-forwarded-for` when running behind a proxy,
/// then the connection's peer address.
pub fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Address + submitted identity key.
///
/// Used for the write class so a burst against one identity cannot exhaust
/// the quota of every other identity behind the same address.
pub fn client_identity_key(req: &Request) -> String {
    let identity = req
        .headers()
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anon");
    format!("{}:{}", client_key(req), identity)
}

// == Middleware State ==
/// One admission class: a limiter plus its key-derivation function.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<RateLimiter>,
    key_fn: KeyFn,
}

impl RateLimitState {
    /// Creates an admission class keyed by client address.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            limiter,
            key_fn: Arc::new(client_key),
        }
    }

    /// Creates an admission class with a custom key-derivation function.
    pub fn with_key_fn(limiter: Arc<RateLimiter>, key_fn: KeyFn) -> Self {
        Self { limiter, key_fn }
    }
}

// == Middleware ==
/// Counts the request against its admission class.
///
/// Admitted requests proceed and their responses carry the
/// `X-RateLimit-*` quota headers; rejected requests short-circuit into a
/// 429 with `Retry-After`.
pub async fn rate_limit(
    State(state): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let key = (state.key_fn)(&req);
    let decision = state.limiter.admit(&key).await;

    if !decision.allowed {
        let retry_after_secs = decision.retry_after_secs.unwrap_or(0);
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ThrottledResponse::new(retry_after_secs)),
        )
            .into_response();
        apply_quota_headers(response.headers_mut(), &decision);
        if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
            response.headers_mut().insert("retry-after", value);
        }
        return response;
    }

    let mut response = next.run(req).await;
    apply_quota_headers(response.headers_mut(), &decision);
    response
}

/// Inserts the `X-RateLimit-Limit` / `-Remaining` / `-Reset` trio.
fn apply_quota_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", value);
    }
    if let Some(reset) = chrono::Utc
        .timestamp_millis_opt(decision.reset_at as i64)
        .single()
    {
        if let Ok(value) = HeaderValue::from_str(&reset.to_rfc3339()) {
            headers.insert("x-ratelimit-reset", value);
        }
    }
}
