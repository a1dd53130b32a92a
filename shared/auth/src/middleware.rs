use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Duration as ChronoDuration;
use shared_context::{Role, RequestContext};
use shared_error::AppError;
use shared_jwt::{decode_jwt, TokenType};
use uuid::Uuid;

/// Routes exempt from the "must reset password" gate (spec §4.2).
const PASSWORD_CHANGE_PATH: &str = "/api/v1/auth/change-password";

/// How long a request has to complete once authenticated, absent a more
/// specific per-call deadline. Suspension points downstream honour this
/// as the cancellation budget (spec §5).
const DEFAULT_REQUEST_BUDGET_SECS: i64 = 30;

pub trait JwtSecretProvider {
    fn jwt_secret(&self) -> &str;
}

#[derive(Debug, Clone, Copy)]
pub struct UserStatus {
    pub active: bool,
    pub school_active: bool,
    pub must_reset_password: bool,
}

/// Queried once per authenticated request so that deactivating a user or
/// a school takes effect immediately, without waiting for token
/// expiry — tokens are self-contained but not blindly trusted for
/// liveness.
#[async_trait::async_trait]
pub trait UserStatusProvider {
    async fn user_status(&self, user_id: Uuid) -> Result<UserStatus, AppError>;
}

pub trait AuthLayerState: JwtSecretProvider + UserStatusProvider + Clone + Send + Sync + 'static {}
impl<T: JwtSecretProvider + UserStatusProvider + Clone + Send + Sync + 'static> AuthLayerState for T {}

/// Tower middleware: verify the bearer access token, enforce account and
/// tenant liveness and the must-reset-password gate, then hand the
/// handler a `RequestContext` via request extensions.
pub async fn auth_middleware<S: AuthLayerState>(
    State(state): State<S>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    let claims = decode_jwt(token, state.jwt_secret(), TokenType::Access)?;

    let status = state.user_status(claims.sub).await?;
    if !status.active {
        return Err(AppError::AccountInactive);
    }
    if claims.tenant_id.is_some() && !status.school_active {
        return Err(AppError::SchoolInactive);
    }
    if status.must_reset_password && request.uri().path() != PASSWORD_CHANGE_PATH {
        return Err(AppError::MustResetPassword);
    }

    let role = Role::parse(&claims.role).ok_or(AppError::InvalidToken)?;
    let locale = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("en")
        .to_string();

    let now = chrono::Utc::now();
    let context = RequestContext {
        user_id: claims.sub,
        role,
        tenant_id: claims.tenant_id,
        username: claims.username,
        locale,
        request_id: Uuid::new_v4(),
        deadline: now + ChronoDuration::seconds(DEFAULT_REQUEST_BUDGET_SECS),
    };

    tracing::debug!(
        user_id = %context.user_id,
        tenant_id = ?context.tenant_id,
        role = %context.role,
        request_id = %context.request_id,
        "authenticated request"
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
