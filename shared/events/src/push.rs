use async_trait::async_trait;
use serde_json::Value;
use shared_error::AppError;
use std::collections::HashMap;

/// Result of one multicast push-gateway call (spec §6 "Push gateway").
/// `failed_tokens` are tokens the gateway reports as *permanently*
/// invalid — the delivery worker (C9) deactivates the matching
/// registration for those and only those; anything else (rate limit,
/// upstream 5xx) must surface as `Err` instead, so it is retried rather
/// than silently treated as a dead token.
#[derive(Debug, Clone, Default)]
pub struct PushResult {
    pub success_count: u32,
    pub failure_count: u32,
    pub failed_tokens: Vec<String>,
}

/// The push-notification gateway's identity is opaque to the core; this
/// trait is the only surface C9 depends on, so any vendor can sit behind
/// it without touching the worker.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &HashMap<String, Value>,
    ) -> Result<PushResult, AppError>;
}
