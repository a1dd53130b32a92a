use axum::extract::{Path, State};
use axum::Json;
use school_service_core::dto::{CreateDisplayTokenReq, DisplayTokenResp};
use shared_auth::{authorize, Capability, TenantContext};
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateDisplayTokenReq>,
) -> Result<ApiResponse<DisplayTokenResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageDisplayTokens)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let (id, secret) = state.display_token_service.create(tenant.tenant_id, &payload.name).await?;
    Ok(ApiResponse::created(DisplayTokenResp {
        id,
        name: payload.name,
        active: true,
        expires_at: payload.expires_at,
        secret: Some(secret),
    }))
}

pub async fn regenerate(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageDisplayTokens)?;
    let secret = state.display_token_service.regenerate(tenant.tenant_id, id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "secret": secret })))
}

pub async fn revoke(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiAck, AppError> {
    authorize(tenant.ctx.role, Capability::ManageDisplayTokens)?;
    state.display_token_service.revoke(tenant.tenant_id, id).await?;
    Ok(ApiAck)
}

pub async fn list(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiResponse<Vec<DisplayTokenResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageDisplayTokens)?;
    let tokens = state.display_token_repo.list(tenant.tenant_id).await?;
    Ok(ApiResponse::ok(
        tokens
            .into_iter()
            .map(|t| DisplayTokenResp {
                id: t.id,
                name: t.name,
                active: t.active,
                expires_at: t.expires_at,
                secret: None,
            })
            .collect(),
    ))
}

/// Public authentication flow for unattended display clients (C7):
/// no bearer JWT, just the opaque secret in the body.
#[derive(serde::Deserialize)]
pub struct AuthenticateReq {
    pub secret: String,
}

pub async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<AuthenticateReq>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let tenant_id = state.display_token_service.authenticate(&payload.secret).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "tenant_id": tenant_id })))
}
