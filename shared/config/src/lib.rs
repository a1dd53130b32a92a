//! Application configuration loaded from environment variables.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// HMAC-SHA256 signing secret, must be >= 32 bytes.
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: i64,

    #[serde(default = "default_jwt_refresh_expiration")]
    pub jwt_refresh_expiration: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// NATS URL backing the notification queue (C8). Optional: the queue
    /// degrades to log-and-drop if unset, same as the teacher's outbox
    /// worker degrades when NATS is unreachable.
    pub nats_url: Option<String>,

    #[serde(default = "default_queue_subject_prefix")]
    pub notification_queue_subject_prefix: String,

    /// Base URL of the push-notification gateway (C9). Opaque vendor.
    pub push_gateway_url: Option<String>,

    /// Bearer credential for the push gateway. Required iff `push_gateway_url` is set.
    pub push_gateway_api_key: Option<String>,

    #[serde(default = "default_push_retry_initial_ms")]
    pub push_retry_initial_ms: u64,

    #[serde(default = "default_push_retry_factor")]
    pub push_retry_factor: u32,

    #[serde(default = "default_push_retry_cap_ms")]
    pub push_retry_cap_ms: u64,

    #[serde(default = "default_push_max_retries")]
    pub push_max_retries: u32,

    /// Length (bytes, pre-encoding) of generated display tokens (C7).
    #[serde(default = "default_display_token_bytes")]
    pub display_token_bytes: usize,

    /// Minimum gap (minutes) between RFID check-in and check-out before
    /// a second scan is treated as a checkout rather than a duplicate.
    #[serde(default = "default_checkout_min_gap_minutes")]
    pub attendance_checkout_min_gap_minutes: i64,

    /// Per-tenant subscriber outbound buffer size for the live-feed hub.
    #[serde(default = "default_live_feed_buffer_size")]
    pub live_feed_buffer_size: usize,

    pub redis_url: Option<String>,
}

fn default_max_connections() -> u32 {
    10
}
fn default_jwt_expiration() -> i64 {
    900 // 15 minutes
}
fn default_jwt_refresh_expiration() -> i64 {
    604_800 // 7 days
}
fn default_bcrypt_cost() -> u32 {
    12
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_queue_subject_prefix() -> String {
    "school.notifications".to_string()
}
fn default_push_retry_initial_ms() -> u64 {
    1_000
}
fn default_push_retry_factor() -> u32 {
    2
}
fn default_push_retry_cap_ms() -> u64 {
    300_000 // 5 minutes
}
fn default_push_max_retries() -> u32 {
    5
}
fn default_display_token_bytes() -> usize {
    32
}
fn default_checkout_min_gap_minutes() -> i64 {
    120 // 2 hours
}
fn default_live_feed_buffer_size() -> usize {
    64
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("no .env file found, relying on process environment");
        }

        let builder = config::Config::builder()
            .set_default("max_connections", 10)?
            .set_default("jwt_expiration", 900)?
            .set_default("jwt_refresh_expiration", 604_800)?
            .set_default("bcrypt_cost", 12)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("notification_queue_subject_prefix", "school.notifications")?
            .set_default("push_retry_initial_ms", 1_000)?
            .set_default("push_retry_factor", 2)?
            .set_default("push_retry_cap_ms", 300_000)?
            .set_default("push_max_retries", 5)?
            .set_default("display_token_bytes", 32)?
            .set_default("attendance_checkout_min_gap_minutes", 120)?
            .set_default("live_feed_buffer_size", 64)?
            .add_source(config::Environment::default());

        builder.build()?.try_deserialize::<Config>()
    }
}
