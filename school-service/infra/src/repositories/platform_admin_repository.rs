use async_trait::async_trait;
use school_service_core::domains::school_admin::School;
use school_service_core::repositories::PlatformAdminRepository;
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PlatformAdminRepositoryImpl {
    pool: PgPool,
}

impl PlatformAdminRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlatformAdminRepository for PlatformAdminRepositoryImpl {
    async fn list_schools(&self) -> Result<Vec<School>, AppError> {
        let rows = sqlx::query_as::<_, School>("SELECT * FROM schools ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_school(&self, school: &School) -> Result<School, AppError> {
        let row = sqlx::query_as::<_, School>(
            r#"
            INSERT INTO schools (id, name, contact_email, contact_phone, timezone, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(school.id)
        .bind(&school.name)
        .bind(&school.contact_email)
        .bind(&school.contact_phone)
        .bind(&school.timezone)
        .bind(school.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_school_active(&self, id: Uuid, active: bool) -> Result<School, AppError> {
        let row = sqlx::query_as::<_, School>(
            "UPDATE schools SET active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Single transaction, in the order spec §4.4 mandates. Every
    /// statement is scoped by `school_id` (or transitively through a
    /// join to a table that is) so this cannot spill into another
    /// tenant even under a bug elsewhere in the call path.
    async fn delete_school_cascade(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM notifications WHERE user_id IN (SELECT id FROM users WHERE school_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM push_registrations WHERE user_id IN (SELECT id FROM users WHERE school_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM homeroom_notes WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM grades WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM violations WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM achievements WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM permit_documents WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM counseling_notes WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM attendances WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM parent_student_links WHERE school_id = $1").bind(id).execute(&mut *tx).await?;

        sqlx::query(
            "DELETE FROM users WHERE school_id = $1 AND role = 'parent'",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM students WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM classes WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM devices WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM display_tokens WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users WHERE school_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM schools WHERE id = $1").bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }
}
