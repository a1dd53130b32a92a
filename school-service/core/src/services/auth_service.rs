use crate::dto::{AuthResp, ChangePasswordReq, LoginReq, UserInfo};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Business logic interface for authentication (C3). Implementations
/// must return a uniform `AppError::InvalidCredentials` for {user
/// missing, password wrong} to avoid enumeration (spec §4.2); tenant-
/// and account-inactive MAY surface as their own, rate-limited variants
/// once the password is known to be correct.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, req: LoginReq) -> Result<AuthResp, AppError>;
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResp, AppError>;
    async fn change_password(&self, user_id: Uuid, req: ChangePasswordReq) -> Result<(), AppError>;
    async fn me(&self, user_id: Uuid, tenant_id: Option<Uuid>) -> Result<UserInfo, AppError>;
}
