use crate::domains::schedule::AttendanceSchedule;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Wraps the pure schedule engine (`domains::schedule::engine`) with
/// persistence and the §4.5 invariants (overlap, default, ten-per-
/// tenant cap) that span more than one schedule at a time.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    async fn create(&self, tenant_id: Uuid, schedule: AttendanceSchedule) -> Result<AttendanceSchedule, AppError>;
    async fn update(&self, tenant_id: Uuid, schedule: AttendanceSchedule) -> Result<AttendanceSchedule, AppError>;
    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError>;
    async fn set_default(&self, tenant_id: Uuid, id: Uuid) -> Result<AttendanceSchedule, AppError>;
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError>;
    async fn active_at(&self, tenant_id: Uuid, instant_local: chrono::NaiveDateTime) -> Result<Option<AttendanceSchedule>, AppError>;
}
