use async_trait::async_trait;
use school_service_core::domains::notification::{Notification, PushRegistration};
use school_service_core::repositories::{NotificationRepository, PushRegistrationRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationRepositoryImpl {
    pool: PgPool,
}

impl NotificationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryImpl {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, user_id, notification_type, title, body, data, read)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.notification_type)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.data)
        .bind(notification.read)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND ($2 = false OR NOT read)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET read = true WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE notifications SET read = true WHERE user_id = $1 AND NOT read")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

pub struct PushRegistrationRepositoryImpl {
    pool: PgPool,
}

impl PushRegistrationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushRegistrationRepository for PushRegistrationRepositoryImpl {
    async fn upsert(&self, registration: &PushRegistration) -> Result<PushRegistration, AppError> {
        let row = sqlx::query_as::<_, PushRegistration>(
            r#"
            INSERT INTO push_registrations (id, user_id, token, platform, active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (token) DO UPDATE
                SET user_id = EXCLUDED.user_id, platform = EXCLUDED.platform,
                    active = true, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(registration.id)
        .bind(registration.user_id)
        .bind(&registration.token)
        .bind(registration.platform)
        .bind(registration.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<PushRegistration>, AppError> {
        let rows = sqlx::query_as::<_, PushRegistration>(
            "SELECT * FROM push_registrations WHERE user_id = $1 AND active",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn deactivate_by_token(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE push_registrations SET active = false, updated_at = now() WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM push_registrations WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
