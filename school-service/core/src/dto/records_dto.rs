use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateGradeReq {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub term: String,
    pub score: f64,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct GradeResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub term: String,
    pub score: f64,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateHomeroomNoteReq {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HomeroomNoteResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub body: String,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCounselingNoteReq {
    pub student_id: Uuid,
    pub internal_note: Option<String>,
    #[validate(length(min = 1))]
    pub parent_summary: String,
}

/// `internal_note` is stripped by the handler (spec §4.3(b)) before this
/// response reaches anyone but a counselor.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CounselingNoteResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub internal_note: Option<String>,
    pub parent_summary: String,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreatePermitReq {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub reason: String,
    pub permit_date: NaiveDate,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdatePermitStatusReq {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PermitResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub reason: String,
    pub permit_date: NaiveDate,
    pub status: String,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateViolationReq {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub points: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ViolationResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub category: String,
    pub description: String,
    pub points: i32,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateAchievementReq {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AchievementResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
}
