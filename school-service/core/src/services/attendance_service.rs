use crate::domains::attendance::Attendance;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared_error::AppError;
use uuid::Uuid;

/// Attendance ingress (C6): RFID and manual paths, both funnelled
/// through the same (student_id, date) upsert so idempotency and the
/// "manual writes win" rule (spec §4.6) live in one place.
#[async_trait]
pub trait AttendanceIngressService: Send + Sync {
    /// Authenticates `device_code`/`api_key`, resolves the student by
    /// `rfid_code`, classifies against the active schedule, and upserts
    /// the attendance row. Returns the same row on a duplicate replay
    /// without enqueuing a second notification.
    async fn ingest_rfid(
        &self,
        device_code: &str,
        api_key: &str,
        rfid_code: &str,
        device_timestamp: DateTime<Utc>,
    ) -> Result<Attendance, AppError>;

    /// Manual entry by an authorized homeroom_teacher/school_admin.
    /// Caller has already verified the class/tenant predicate.
    async fn ingest_manual(
        &self,
        tenant_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
        status: &str,
        check_in_time: Option<DateTime<Utc>>,
        check_out_time: Option<DateTime<Utc>>,
    ) -> Result<Attendance, AppError>;

    /// Day-roll-over sweep: writes `absent` for every student in the
    /// tenant with no attendance row for `date` whose active schedule's
    /// window has already closed.
    async fn sweep_absences(&self, tenant_id: Uuid, date: NaiveDate) -> Result<u64, AppError>;
}
