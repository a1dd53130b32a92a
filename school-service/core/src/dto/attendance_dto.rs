use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct RfidEventReq {
    #[validate(length(min = 1))]
    pub device_code: String,
    #[validate(length(min = 1))]
    pub api_key: String,
    #[validate(length(min = 1))]
    pub rfid_code: String,
    pub device_timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct ManualAttendanceReq {
    pub student_id: Uuid,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub status: String,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AttendanceResp {
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: String,
    pub method: String,
}
