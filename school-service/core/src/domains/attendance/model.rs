use crate::domains::schedule::AttendanceStatus;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum AttendanceMethod {
    Rfid,
    Manual,
}

/// One attendance row per (student, date), created on first check-in
/// and updated in place for check-out. `status` is fixed at creation
/// time — changing a schedule later never recomputes it (spec §3, §8
/// invariant 10).
#[derive(Debug, Clone, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimum gap required between check-in and check-out before a second
/// RFID tap is treated as a checkout rather than a duplicate (spec
/// §4.6); overridden by `Config::attendance_checkout_min_gap_minutes`.
pub const DEFAULT_CHECKOUT_MIN_GAP_MINUTES: i64 = 120;
