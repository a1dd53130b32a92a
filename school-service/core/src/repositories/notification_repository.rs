use crate::domains::notification::{Notification, PushRegistration};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait PushRegistrationRepository: Send + Sync {
    async fn upsert(&self, registration: &PushRegistration) -> Result<PushRegistration, AppError>;
    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<PushRegistration>, AppError>;
    async fn deactivate_by_token(&self, token: &str) -> Result<(), AppError>;
    async fn delete(&self, user_id: Uuid, token: &str) -> Result<(), AppError>;
}
