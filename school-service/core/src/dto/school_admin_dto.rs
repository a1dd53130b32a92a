use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SchoolResp {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub timezone: String,
    pub active: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSchoolReq {
    #[validate(length(min = 1))]
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(length(min = 1))]
    pub timezone: String,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateUserReq {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateUserReq {
    pub active: Option<bool>,
    pub must_reset_password: Option<bool>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserResp {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub role: String,
    pub active: bool,
    pub must_reset_password: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateClassReq {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub grade: String,
    #[validate(length(min = 1))]
    pub academic_year: String,
    pub homeroom_teacher_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ClassResp {
    pub id: Uuid,
    pub name: String,
    pub grade: String,
    pub academic_year: String,
    pub homeroom_teacher_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateStudentReq {
    #[validate(length(min = 1))]
    pub nis: String,
    #[validate(length(min = 1))]
    pub nisn: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub class_id: Uuid,
    pub rfid_code: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateStudentReq {
    pub name: String,
    pub class_id: Uuid,
    pub rfid_code: Option<String>,
    pub active: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StudentResp {
    pub id: Uuid,
    pub class_id: Uuid,
    pub nis: String,
    pub nisn: String,
    pub name: String,
    pub rfid_code: Option<String>,
    pub user_id: Option<Uuid>,
    pub active: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct LinkParentReq {
    pub parent_user_id: Uuid,
    pub student_id: Uuid,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateDeviceReq {
    #[validate(length(min = 1))]
    pub device_code: String,
    #[validate(length(min = 1))]
    pub name: String,
}

/// `api_key` is returned exactly once, at creation/rotation time — the
/// persisted row only ever holds its hash.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeviceResp {
    pub id: Uuid,
    pub device_code: String,
    pub name: String,
    pub active: bool,
    pub api_key: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateDisplayTokenReq {
    #[validate(length(min = 1))]
    pub name: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// `secret` is returned exactly once, at creation/rotation time.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DisplayTokenResp {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub secret: Option<String>,
}
