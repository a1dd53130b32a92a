use crate::limiter::{RateLimitError, RateLimiter};
use std::sync::Arc;
use std::time::Duration;

/// Snapshot returned to the caller after recording a login attempt.
#[derive(Debug, Clone)]
pub struct LockoutStatus {
    pub is_locked: bool,
    pub failed_attempts: u32,
    pub remaining_seconds: u64,
    pub delay_ms: u64,
}

impl LockoutStatus {
    pub fn unlocked(failed_attempts: u32, delay_ms: u64) -> Self {
        Self {
            is_locked: false,
            failed_attempts,
            remaining_seconds: 0,
            delay_ms,
        }
    }

    pub fn locked(failed_attempts: u32, remaining_seconds: u64) -> Self {
        Self {
            is_locked: true,
            failed_attempts,
            remaining_seconds,
            delay_ms: 0,
        }
    }
}

/// Tracks failed login attempts per account and imposes a lockout once
/// `threshold` is crossed within the rate limiter's window. When
/// `progressive_delays` is set, callers are expected to sleep
/// `delay_ms` before responding, slowing down brute-force attempts
/// without an outright lock (spec §4.2: tenant-inactive / account-
/// inactive accounts surface distinct, rate-limited messages rather
/// than an ordinary auth failure).
#[derive(Clone)]
pub struct AccountLockout {
    limiter: Arc<dyn RateLimiter>,
    threshold: u32,
    lockout_duration: Duration,
    progressive_delays: bool,
}

impl AccountLockout {
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        threshold: u32,
        lockout_duration: Duration,
        progressive_delays: bool,
    ) -> Self {
        Self {
            limiter,
            threshold,
            lockout_duration,
            progressive_delays,
        }
    }

    fn delay_for(&self, failed_attempts: u32) -> u64 {
        if !self.progressive_delays {
            return 0;
        }
        // 0, 250ms, 500ms, 1s, 2s, capped at 8s.
        let step = failed_attempts.saturating_sub(1).min(5);
        250u64.saturating_mul(1u64 << step).min(8_000)
    }

    /// Records a failed login attempt and reports whether the account
    /// is now locked out.
    pub async fn record_failure(&self, account_key: &str) -> Result<LockoutStatus, RateLimitError> {
        let result = self
            .limiter
            .check_rate_limit(
                &format!("lockout:{account_key}"),
                self.threshold,
                self.lockout_duration,
            )
            .await?;

        let failed_attempts = self.threshold.saturating_sub(result.remaining).max(1);
        if result.allowed {
            Ok(LockoutStatus::unlocked(failed_attempts, self.delay_for(failed_attempts)))
        } else {
            Ok(LockoutStatus::locked(self.threshold, result.retry_after))
        }
    }

    /// Clears the failure counter on a successful login.
    pub async fn record_success(&self, account_key: &str) -> Result<(), RateLimitError> {
        self.limiter.reset(&format!("lockout:{account_key}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_limiter::InMemoryRateLimiter;

    #[tokio::test]
    async fn locks_after_threshold_failures() {
        let lockout = AccountLockout::new(
            Arc::new(InMemoryRateLimiter::new()),
            3,
            Duration::from_secs(900),
            false,
        );
        for _ in 0..3 {
            let status = lockout.record_failure("user:1").await.unwrap();
            assert!(!status.is_locked);
        }
        let status = lockout.record_failure("user:1").await.unwrap();
        assert!(status.is_locked);
    }

    #[tokio::test]
    async fn success_clears_failure_count() {
        let lockout = AccountLockout::new(
            Arc::new(InMemoryRateLimiter::new()),
            3,
            Duration::from_secs(900),
            false,
        );
        lockout.record_failure("user:2").await.unwrap();
        lockout.record_failure("user:2").await.unwrap();
        lockout.record_success("user:2").await.unwrap();
        let status = lockout.record_failure("user:2").await.unwrap();
        assert_eq!(status.failed_attempts, 1);
        assert!(!status.is_locked);
    }
}
