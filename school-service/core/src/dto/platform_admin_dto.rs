use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateSchoolReq {
    #[validate(length(min = 1))]
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(length(min = 1))]
    pub timezone: String,
    /// Initial `school_admin` account created alongside the school.
    #[validate(length(min = 1))]
    pub admin_username: String,
    #[validate(length(min = 8))]
    pub admin_password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SetSchoolActiveReq {
    pub active: bool,
}
