use crate::domains::attendance::Attendance;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Attendance>, AppError>;
    async fn find_by_student_date(
        &self,
        tenant_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError>;
    async fn create(&self, attendance: &Attendance) -> Result<Attendance, AppError>;
    async fn update(&self, attendance: &Attendance) -> Result<Attendance, AppError>;
    async fn list_for_day(&self, tenant_id: Uuid, date: NaiveDate) -> Result<Vec<Attendance>, AppError>;
    async fn list_for_class_day(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError>;
    /// Students in the tenant who have no row for `date`, used by the
    /// day-roll-over sweep that writes `absent` (spec §4.5).
    async fn students_without_attendance(
        &self,
        tenant_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Uuid>, AppError>;
}
