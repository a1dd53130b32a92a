use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct NotificationResp {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterPushTokenReq {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub platform: String,
}
