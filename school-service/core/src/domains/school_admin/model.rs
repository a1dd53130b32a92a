use chrono::{DateTime, Utc};
use shared_context::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Tenant root. Deactivating a school blocks every non-platform-admin
/// login bound to it (spec §3).
#[derive(Debug, Clone, FromRow)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// IANA zone name, validated against a fixed allow-list at write time.
    pub timezone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User entity. `school_id` is `None` only for `platform_admin`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub role: String,
    pub username: String,
    pub password_hash: String,
    pub must_reset_password: bool,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Class {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub grade: String,
    pub academic_year: String,
    pub homeroom_teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub school_id: Uuid,
    pub class_id: Uuid,
    pub nis: String,
    pub nisn: String,
    pub name: String,
    pub rfid_code: Option<String>,
    /// The `user` row (role = student) this profile belongs to, when
    /// the student has their own login (spec §3: "a student-user must
    /// have a corresponding student record"). `None` for students who
    /// are tracked only via RFID/guardian access.
    pub user_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Association row for the parent <-> student many-to-many relation
/// (spec §9 "cyclic graphs are modelled as two typed relations plus an
/// association table; holders store ids, not live references").
#[derive(Debug, Clone, FromRow)]
pub struct ParentStudentLink {
    pub id: Uuid,
    pub school_id: Uuid,
    pub parent_user_id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// RFID reader or similar unattended ingress device (§4.6, §6 "Device
/// credential"). `api_key_hash` is the SHA-256 digest of the rotatable
/// api_key; the key itself is never persisted.
#[derive(Debug, Clone, FromRow)]
pub struct Device {
    pub id: Uuid,
    pub school_id: Uuid,
    pub device_code: String,
    pub api_key_hash: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Opaque capability token for unattended public displays (C7). The
/// secret itself is only ever returned from create/regenerate; the
/// persisted row never round-trips it back out.
#[derive(Debug, Clone, FromRow)]
pub struct DisplayToken {
    pub id: Uuid,
    pub school_id: Uuid,
    pub secret_hash: String,
    pub name: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DisplayToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.map(|exp| exp > now).unwrap_or(true)
    }
}
