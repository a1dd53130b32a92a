use crate::limiter::RateLimiter;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Generic per-IP limiter for unauthenticated endpoints (login, device
/// ingress). Authenticated, per-account limiting is handled separately
/// by `AccountLockout`, which is keyed by account rather than address.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<dyn RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = format!("ip:{}", addr.ip());
    match limiter.check_rate_limit(&key, 60, Duration::from_secs(60)).await {
        Ok(result) if result.allowed => next.run(request).await,
        Ok(result) => (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(json!({
                "success": false,
                "error": {
                    "code": "RATE_LIMITED",
                    "message": "too many requests, try again later",
                }
            })),
        )
            .into_response()
            .tap_retry_after(result.retry_after),
        Err(e) => {
            tracing::error!(error = %e, "rate limiter unavailable, failing open");
            next.run(request).await
        }
    }
}

trait TapRetryAfter {
    fn tap_retry_after(self, seconds: u64) -> Self;
}

impl TapRetryAfter for Response {
    fn tap_retry_after(mut self, seconds: u64) -> Self {
        if let Ok(value) = seconds.to_string().parse() {
            self.headers_mut().insert("retry-after", value);
        }
        self
    }
}
