use std::time::Duration;

/// Knobs for login-path rate limiting, loaded by `shared_config::Config`
/// and handed to `AccountLockout`/`RateLimiter` at startup.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub lockout_duration: Duration,
    pub progressive_delays: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: 5,
            login_window: Duration::from_secs(300),
            lockout_duration: Duration::from_secs(900),
            progressive_delays: true,
        }
    }
}
