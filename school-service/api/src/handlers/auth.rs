use axum::extract::State;
use axum::Json;
use school_service_core::dto::{AuthResp, ChangePasswordReq, LoginReq, RefreshReq, UserInfo};
use shared_auth::Context as RequestContext;
use shared_error::AppError;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginReq,
    responses((status = 200, description = "Login successful", body = AuthResp))
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginReq>,
) -> Result<ApiResponse<AuthResp>, AppError> {
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;
    let resp = state.auth_service.login(payload).await?;
    Ok(ApiResponse::ok(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshReq,
    responses((status = 200, description = "Token refreshed", body = AuthResp))
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshReq>,
) -> Result<ApiResponse<AuthResp>, AppError> {
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;
    let resp = state.auth_service.refresh_token(&payload.refresh_token).await?;
    Ok(ApiResponse::ok(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordReq,
    responses((status = 200, description = "Password changed"))
)]
pub async fn change_password(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<ChangePasswordReq>,
) -> Result<ApiAck, AppError> {
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;
    state.auth_service.change_password(ctx.user_id, payload).await?;
    Ok(ApiAck)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses((status = 200, description = "Current user", body = UserInfo))
)]
pub async fn me(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<UserInfo>, AppError> {
    let resp = state.auth_service.me(ctx.user_id, ctx.tenant_id).await?;
    Ok(ApiResponse::ok(resp))
}
