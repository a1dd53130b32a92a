use crate::domains::schedule::AttendanceSchedule;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<AttendanceSchedule>, AppError>;
    /// Loads every active schedule for the tenant — the input the
    /// schedule engine's pure functions operate on.
    async fn list_active(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError>;
    async fn list_all(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError>;
    async fn count(&self, tenant_id: Uuid) -> Result<i64, AppError>;
    async fn create(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError>;
    async fn update(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError>;
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError>;
    async fn clear_default(&self, tenant_id: Uuid) -> Result<(), AppError>;
    async fn is_in_use(&self, id: Uuid, tenant_id: Uuid) -> Result<bool, AppError>;
}
