use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use shared_context::RequestContext;
use shared_error::AppError;
use uuid::Uuid;

/// Pulls the `RequestContext` installed by `auth_middleware` out of
/// request extensions. Handlers that only need "who is calling" (and
/// are fine handling `platform_admin`'s absent tenant themselves) use
/// this directly; everyone else should use `TenantContext`.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

/// A `RequestContext` guaranteed to carry a tenant id. Missing tenant
/// context on a tenant-scoped route is always `AUTHZ_TENANT_REQUIRED`,
/// never a 500 (spec §7) — that mapping happens exactly once, here.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub ctx: RequestContext,
    pub tenant_id: Uuid,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        let tenant_id = ctx.tenant_id.ok_or(AppError::TenantRequired)?;
        Ok(TenantContext { ctx, tenant_id })
    }
}

/// Device-credential authentication (spec §6 "Device credential"):
/// devices present `device_code` + `api_key` out-of-band and get back a
/// bare tenant id, never a user id.
#[derive(Debug, Clone, Copy)]
pub struct DeviceContext {
    pub tenant_id: Uuid,
    pub device_id: Uuid,
}

#[async_trait]
pub trait DeviceAuthenticator {
    async fn authenticate_device(
        &self,
        device_code: &str,
        api_key: &str,
    ) -> Result<DeviceContext, AppError>;
}

#[async_trait]
impl<S> FromRequestParts<S> for DeviceContext
where
    S: DeviceAuthenticator + Clone + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let device_code = parts
            .headers
            .get("x-device-code")
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::InvalidToken)?;
        let api_key = parts
            .headers
            .get("x-device-api-key")
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::InvalidToken)?;

        state.authenticate_device(device_code, api_key).await
    }
}
