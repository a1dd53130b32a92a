pub mod config;
pub mod limiter;
pub mod lockout;
pub mod memory_limiter;
pub mod middleware;
pub mod redis_limiter;

pub use config::RateLimitConfig;
pub use limiter::{RateLimitError, RateLimitResult, RateLimiter};
pub use lockout::{AccountLockout, LockoutStatus};
pub use memory_limiter::InMemoryRateLimiter;
pub use middleware::rate_limit_middleware;
pub use redis_limiter::RedisRateLimiter;
