use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_error::AppError;
use shared_events::{PushGateway, PushResult};
use std::collections::HashMap;

/// `reqwest`-backed implementation of the vendor-opaque push gateway
/// (spec §6). The vendor's own wire shape is adapted to/from
/// `PushResult` here; nothing upstream of this file knows which vendor
/// it is talking to.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPushGateway {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct MulticastRequest<'a> {
    tokens: &'a [String],
    title: &'a str,
    body: &'a str,
    data: &'a HashMap<String, Value>,
}

#[derive(Deserialize)]
struct MulticastResponse {
    success_count: u32,
    failure_count: u32,
    #[serde(default)]
    failed_tokens: Vec<String>,
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &HashMap<String, Value>,
    ) -> Result<PushResult, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&MulticastRequest { tokens, title, body, data })
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("push gateway request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "push gateway returned {}",
                response.status()
            )));
        }

        let parsed: MulticastResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("push gateway returned malformed json: {e}")))?;

        Ok(PushResult {
            success_count: parsed.success_count,
            failure_count: parsed.failure_count,
            failed_tokens: parsed.failed_tokens,
        })
    }
}
