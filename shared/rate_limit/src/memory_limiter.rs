use crate::limiter::{RateLimitError, RateLimitResult, RateLimiter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;

struct Window {
    count: u32,
    started_at: Instant,
}

/// In-process fallback used in tests and single-instance deployments.
/// Does not coordinate across processes; `RedisRateLimiter` is the
/// distributed equivalent behind the same trait.
#[derive(Clone, Default)]
pub struct InMemoryRateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<RateLimitResult, RateLimitError> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let reset_at_secs = |started_at: Instant| {
            let elapsed = now.duration_since(started_at);
            let remaining = window.saturating_sub(elapsed);
            (SystemTime::now() + remaining)
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs()
        };

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(entry.started_at) >= window {
            entry.count = 0;
            entry.started_at = now;
        }

        if entry.count >= max_requests {
            return Ok(RateLimitResult::denied(max_requests, reset_at_secs(entry.started_at)));
        }

        entry.count += 1;
        let remaining = max_requests - entry.count;
        Ok(RateLimitResult::allowed(max_requests, remaining, reset_at_secs(entry.started_at)))
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitError> {
        self.windows.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denies_after_limit() {
        let limiter = InMemoryRateLimiter::new();
        for _ in 0..5 {
            let r = limiter
                .check_rate_limit("ip:1", 5, Duration::from_secs(60))
                .await
                .unwrap();
            assert!(r.allowed);
        }
        let r = limiter
            .check_rate_limit("ip:1", 5, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!r.allowed);
    }
}
