use async_trait::async_trait;
use chrono::NaiveDate;
use school_service_core::domains::attendance::Attendance;
use school_service_core::repositories::AttendanceRepository;
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AttendanceRepositoryImpl {
    pool: PgPool,
}

impl AttendanceRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for AttendanceRepositoryImpl {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendances WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_student_date(
        &self,
        tenant_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendances WHERE school_id = $1 AND student_id = $2 AND date = $3",
        )
        .bind(tenant_id)
        .bind(student_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, attendance: &Attendance) -> Result<Attendance, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendances
                (id, school_id, student_id, schedule_id, date, check_in_time,
                 check_out_time, status, method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (student_id, date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(attendance.id)
        .bind(attendance.school_id)
        .bind(attendance.student_id)
        .bind(attendance.schedule_id)
        .bind(attendance.date)
        .bind(attendance.check_in_time)
        .bind(attendance.check_out_time)
        .bind(attendance.status)
        .bind(attendance.method)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            // Lost the insert race; the existing row is the idempotent result (spec §4.6).
            None => self
                .find_by_student_date(attendance.school_id, attendance.student_id, attendance.date)
                .await?
                .ok_or_else(|| AppError::Internal("attendance upsert raced without a winner".into())),
        }
    }

    async fn update(&self, attendance: &Attendance) -> Result<Attendance, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendances
            SET check_in_time = $3, check_out_time = $4, updated_at = now()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(attendance.id)
        .bind(attendance.school_id)
        .bind(attendance.check_in_time)
        .bind(attendance.check_out_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_day(&self, tenant_id: Uuid, date: NaiveDate) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendances WHERE school_id = $1 AND date = $2 ORDER BY check_in_time",
        )
        .bind(tenant_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_for_class_day(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT a.* FROM attendances a
            JOIN students s ON s.id = a.student_id
            WHERE a.school_id = $1 AND s.class_id = $2 AND a.date = $3
            ORDER BY a.check_in_time
            "#,
        )
        .bind(tenant_id)
        .bind(class_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn students_without_attendance(
        &self,
        tenant_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT s.id FROM students s
            WHERE s.school_id = $1 AND s.active
            AND NOT EXISTS (
                SELECT 1 FROM attendances a
                WHERE a.student_id = s.id AND a.date = $2
            )
            "#,
        )
        .bind(tenant_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
