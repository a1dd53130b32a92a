//! Notification fan-out (C8). Persist-then-enqueue: the `Notification`
//! rows are the durable source of truth, written inside the service
//! call; the NATS enqueue that follows is best-effort and only ever
//! logs a warning on failure (spec §4.8), mirroring how the teacher's
//! outbox pattern separates "committed" from "delivered".

use async_trait::async_trait;
use school_service_core::domains::notification::{Notification, NotificationType};
use school_service_core::repositories::NotificationRepository;
use school_service_core::services::NotificationService;
use serde_json::Value;
use shared_context::Clock;
use shared_error::AppError;
use shared_events::{NatsQueue, NotificationQueueItem};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationServiceImpl {
    notification_repo: Arc<dyn NotificationRepository>,
    queue: Arc<NatsQueue>,
    queue_subject: String,
    clock: Arc<dyn Clock>,
}

impl NotificationServiceImpl {
    pub fn new(
        notification_repo: Arc<dyn NotificationRepository>,
        queue: Arc<NatsQueue>,
        queue_subject: String,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notification_repo,
            queue,
            queue_subject,
            clock,
        }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    async fn notify(
        &self,
        recipients: &[Uuid],
        notification_type: NotificationType,
        title: &str,
        body: &str,
        data: HashMap<String, Value>,
    ) -> Result<Vec<Notification>, AppError> {
        let mut created = Vec::with_capacity(recipients.len());

        for &user_id in recipients {
            let notification = Notification {
                id: Uuid::new_v4(),
                user_id,
                notification_type: notification_type.as_str().to_string(),
                title: title.to_string(),
                body: body.to_string(),
                data: sqlx::types::Json(data.clone()),
                read: false,
                created_at: self.clock.now(),
            };

            let row = self.notification_repo.create(&notification).await?;

            let queue_item = NotificationQueueItem {
                notification_id: row.id,
                user_id: row.user_id,
                notification_type: notification_type.as_str().to_string(),
                title: row.title.clone(),
                body: row.body.clone(),
                data: data.clone(),
                retry_count: 0,
                created_at: row.created_at,
            };

            if let Err(e) = self.queue.enqueue(&self.queue_subject, &queue_item).await {
                tracing::warn!(
                    notification_id = %row.id,
                    error = %e,
                    "failed to enqueue notification for push delivery; row is persisted regardless"
                );
            }

            created.push(row);
        }

        Ok(created)
    }

    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        self.notification_repo.list_for_user(user_id, unread_only).await
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.notification_repo.mark_read(id, user_id).await
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.notification_repo.mark_all_read(user_id).await
    }
}
