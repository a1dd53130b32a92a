use crate::limiter::{RateLimitError, RateLimitResult, RateLimiter};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::{Duration, SystemTime};

/// Distributed counterpart of `InMemoryRateLimiter`, backed by Redis
/// `INCR` + `EXPIRE` so counters are shared across every instance of
/// the service.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: ConnectionManager,
}

impl RedisRateLimiter {
    pub async fn connect(redis_url: &str) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| RateLimitError::Redis(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| RateLimitError::Redis(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<RateLimitResult, RateLimitError> {
        let mut conn = self.conn.clone();
        let redis_key = format!("rate_limit:{key}");

        let count: u32 = conn
            .incr(&redis_key, 1)
            .await
            .map_err(|e| RateLimitError::Redis(e.to_string()))?;

        if count == 1 {
            let _: () = conn
                .expire(&redis_key, window.as_secs() as i64)
                .await
                .map_err(|e| RateLimitError::Redis(e.to_string()))?;
        }

        let ttl: i64 = conn
            .ttl(&redis_key)
            .await
            .map_err(|e| RateLimitError::Redis(e.to_string()))?;
        let reset_at = (SystemTime::now() + Duration::from_secs(ttl.max(0) as u64))
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        if count > max_requests {
            Ok(RateLimitResult::denied(max_requests, reset_at))
        } else {
            Ok(RateLimitResult::allowed(max_requests, max_requests - count, reset_at))
        }
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        let redis_key = format!("rate_limit:{key}");
        let _: () = conn
            .del(&redis_key)
            .await
            .map_err(|e| RateLimitError::Redis(e.to_string()))?;
        Ok(())
    }
}
