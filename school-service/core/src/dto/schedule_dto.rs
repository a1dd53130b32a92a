use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateScheduleReq {
    #[validate(length(min = 1))]
    pub name: String,
    /// "HH:MM" local time.
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 0))]
    pub late_threshold_minutes: i32,
    pub very_late_threshold_minutes: Option<i32>,
    /// Weekday names, e.g. ["mon", "tue", "wed", "thu", "fri"].
    #[validate(length(min = 1))]
    pub days_of_week: Vec<String>,
    pub is_default: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ScheduleResp {
    pub id: Uuid,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub late_threshold_minutes: i32,
    pub very_late_threshold_minutes: Option<i32>,
    pub days_of_week: Vec<String>,
    pub active: bool,
    pub is_default: bool,
}
