use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginReq {
    #[validate(length(min = 1))]
    #[schema(example = "jane.doe")]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Authentication response. `tenant_id` is absent for `platform_admin`.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResp {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 900)]
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub role: String,
    pub must_reset_password: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct RefreshReq {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordReq {
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}
