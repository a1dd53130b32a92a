use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// One fan-out item enqueued per target-user notification (spec §4.8,
/// §6 "Queue"). `retry_count` is mutated in place by the delivery
/// worker's backoff loop (C9) and the item is re-enqueued, not mutated
/// at rest — the queue has no concept of updating a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationQueueItem {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: HashMap<String, Value>,
    #[serde(default)]
    pub retry_count: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl NotificationQueueItem {
    pub fn with_incremented_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone()
        }
    }
}
