use axum::extract::{Path, Query, State};
use axum::Json;
use school_service_core::domains::notification::{PushPlatform, PushRegistration};
use school_service_core::dto::{NotificationResp, RegisterPushTokenReq};
use shared_auth::Context as RequestContext;
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<NotificationResp>>, AppError> {
    let notifications = state
        .notification_service
        .list_for_user(ctx.user_id, query.unread_only)
        .await?;

    Ok(ApiResponse::ok(
        notifications
            .into_iter()
            .map(|n| NotificationResp {
                id: n.id,
                notification_type: n.notification_type,
                title: n.title,
                body: n.body,
                data: n.data.0,
                read: n.read,
                created_at: n.created_at,
            })
            .collect(),
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiAck, AppError> {
    state.notification_service.mark_read(ctx.user_id, id).await?;
    Ok(ApiAck)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let count = state.notification_service.mark_all_read(ctx.user_id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "marked": count })))
}

fn parse_platform(s: &str) -> Result<PushPlatform, AppError> {
    match s.to_ascii_lowercase().as_str() {
        "android" => Ok(PushPlatform::Android),
        "ios" => Ok(PushPlatform::Ios),
        other => Err(AppError::InvalidValue(format!("unknown platform '{other}'"))),
    }
}

pub async fn register_token(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<RegisterPushTokenReq>,
) -> Result<ApiAck, AppError> {
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;
    let platform = parse_platform(&payload.platform)?;

    state
        .push_registration_repo
        .upsert(&PushRegistration {
            id: Uuid::new_v4(),
            user_id: ctx.user_id,
            token: payload.token,
            platform,
            active: true,
            updated_at: state.clock.now(),
        })
        .await?;

    Ok(ApiAck)
}

pub async fn list_tokens(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<String>>, AppError> {
    let tokens = state.push_registration_repo.list_active_for_user(ctx.user_id).await?;
    Ok(ApiResponse::ok(tokens.into_iter().map(|t| t.token).collect()))
}

#[derive(serde::Deserialize)]
pub struct DeleteTokenReq {
    pub token: String,
}

pub async fn delete_token(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<DeleteTokenReq>,
) -> Result<ApiAck, AppError> {
    state.push_registration_repo.delete(ctx.user_id, &payload.token).await?;
    Ok(ApiAck)
}
