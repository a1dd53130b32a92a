use async_trait::async_trait;
use school_service_core::domains::schedule::AttendanceSchedule;
use school_service_core::repositories::ScheduleRepository;
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ScheduleRepositoryImpl {
    pool: PgPool,
}

impl ScheduleRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<AttendanceSchedule>, AppError> {
        let row = sqlx::query_as::<_, AttendanceSchedule>(
            "SELECT * FROM attendance_schedules WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_active(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError> {
        let rows = sqlx::query_as::<_, AttendanceSchedule>(
            "SELECT * FROM attendance_schedules WHERE school_id = $1 AND active ORDER BY id",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError> {
        let rows = sqlx::query_as::<_, AttendanceSchedule>(
            "SELECT * FROM attendance_schedules WHERE school_id = $1 ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self, tenant_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM attendance_schedules WHERE school_id = $1")
                .bind(tenant_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn create(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
        let row = sqlx::query_as::<_, AttendanceSchedule>(
            r#"
            INSERT INTO attendance_schedules
                (id, school_id, name, start_time, end_time, late_threshold_minutes,
                 very_late_threshold_minutes, days_of_week, active, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.school_id)
        .bind(&schedule.name)
        .bind(schedule.start_time)
        .bind(schedule.end_time)
        .bind(schedule.late_threshold_minutes)
        .bind(schedule.very_late_threshold_minutes)
        .bind(schedule.days_of_week)
        .bind(schedule.active)
        .bind(schedule.is_default)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
        let row = sqlx::query_as::<_, AttendanceSchedule>(
            r#"
            UPDATE attendance_schedules
            SET name = $3, start_time = $4, end_time = $5, late_threshold_minutes = $6,
                very_late_threshold_minutes = $7, days_of_week = $8, active = $9,
                is_default = $10, updated_at = now()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.school_id)
        .bind(&schedule.name)
        .bind(schedule.start_time)
        .bind(schedule.end_time)
        .bind(schedule.late_threshold_minutes)
        .bind(schedule.very_late_threshold_minutes)
        .bind(schedule.days_of_week)
        .bind(schedule.active)
        .bind(schedule.is_default)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM attendance_schedules WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_default(&self, tenant_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE attendance_schedules SET is_default = false WHERE school_id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_in_use(&self, id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM attendances WHERE schedule_id = $1 AND school_id = $2)",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
