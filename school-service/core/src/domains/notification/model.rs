use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// Domain event kinds that are persisted and fanned out (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    AttendanceLate,
    AttendanceVeryLate,
    AttendanceAbsent,
    NewGrade,
    NewViolation,
    NewAchievement,
    NewPermit,
    NewHomeroomNote,
    NewCounselingNote,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttendanceLate => "attendance_late",
            Self::AttendanceVeryLate => "attendance_very_late",
            Self::AttendanceAbsent => "attendance_absent",
            Self::NewGrade => "new_grade",
            Self::NewViolation => "new_violation",
            Self::NewAchievement => "new_achievement",
            Self::NewPermit => "new_permit",
            Self::NewHomeroomNote => "new_homeroom_note",
            Self::NewCounselingNote => "new_counseling_note",
        }
    }
}

/// Persisted, per-recipient notification row. `data` carries structured
/// references (e.g. `attendance_id`) rather than duplicating the source
/// record.
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub data: sqlx::types::Json<HashMap<String, Value>>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PushPlatform {
    Android,
    Ios,
}

/// A device's opaque push token, globally unique across the system
/// (spec §3). Deactivated in place by the delivery worker when the
/// gateway reports it as permanently invalid.
#[derive(Debug, Clone, FromRow)]
pub struct PushRegistration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub platform: PushPlatform,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}
