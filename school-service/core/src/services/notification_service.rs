use crate::domains::notification::{Notification, NotificationType};
use async_trait::async_trait;
use serde_json::Value;
use shared_error::AppError;
use std::collections::HashMap;
use uuid::Uuid;

/// Persist-then-enqueue (C8). `notify` writes the `Notification` rows
/// first (the source of truth) and then makes a best-effort attempt to
/// enqueue fan-out items; a failed enqueue logs a warning but never
/// fails the call (spec §4.8).
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify(
        &self,
        recipients: &[Uuid],
        notification_type: NotificationType,
        title: &str,
        body: &str,
        data: HashMap<String, Value>,
    ) -> Result<Vec<Notification>, AppError>;

    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError>;
}
