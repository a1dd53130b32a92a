//! Rate limiter trait and result types, shared by the in-memory and
//! Redis-backed implementations.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: u64,
    pub retry_after: u64,
}

impl RateLimitResult {
    pub fn allowed(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at,
            retry_after: reset_at.saturating_sub(now_secs()),
        }
    }

    pub fn denied(limit: u32, reset_at: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at,
            retry_after: reset_at.saturating_sub(now_secs()),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("redis error: {0}")]
    Redis(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Sliding-fixed-window counter, keyed by caller-chosen string (IP,
/// user id, ...). `check_rate_limit` both checks and increments.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<RateLimitResult, RateLimitError>;

    async fn reset(&self, key: &str) -> Result<(), RateLimitError>;
}
