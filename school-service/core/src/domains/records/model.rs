use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Conventional record-keeping surface owned by a `Student` (spec §3
/// "Ownership"). None of these carry the engineering weight of C1-C11;
/// they exist so the notification fan-out (§4.8) has something real to
/// fan out.
#[derive(Debug, Clone, FromRow)]
pub struct Grade {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub subject: String,
    pub term: String,
    pub score: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct HomeroomNote {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Counseling notes carry a counselor-only field. `internal_note` must
/// never reach a non-counselor response (spec §4.3(b)); `parent_summary`
/// is the only field visible to homeroom_teacher, parent, and student.
#[derive(Debug, Clone, FromRow)]
pub struct CounselingNote {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub internal_note: Option<String>,
    pub parent_summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PermitStatus {
    Pending,
    Approved,
    Denied,
}

#[derive(Debug, Clone, FromRow)]
pub struct PermitDocument {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub reason: String,
    pub permit_date: NaiveDate,
    pub status: PermitStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Violation {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub category: String,
    pub description: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub created_by_user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}
