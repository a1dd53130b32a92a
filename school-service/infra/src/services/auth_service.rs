//! Authentication service (C3). Grounded on
//! `services/user_service/infra/src/auth/service.rs`'s
//! `AuthServiceImpl`: bcrypt password verification, JWT issuance
//! through `shared_jwt`, uniform `InvalidCredentials` on the
//! credential-lookup path. The teacher's `Session` table is dropped
//! here (§D1 in the grounding ledger) — tokens are self-contained and
//! stateless, so refresh re-verifies the user and tenant are still
//! active instead of consulting a revocation list.

use async_trait::async_trait;
use school_service_core::dto::{AuthResp, ChangePasswordReq, LoginReq, UserInfo};
use school_service_core::repositories::{SchoolRepository, UserRepository};
use school_service_core::services::AuthService;
use shared_context::Clock;
use shared_error::AppError;
use shared_jwt::{decode_jwt, encode_jwt, Claims, TokenType};
use std::sync::Arc;
use uuid::Uuid;

pub struct AuthServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    school_repo: Arc<dyn SchoolRepository>,
    clock: Arc<dyn Clock>,
    jwt_secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl AuthServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        school_repo: Arc<dyn SchoolRepository>,
        clock: Arc<dyn Clock>,
        jwt_secret: String,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Self {
        Self {
            user_repo,
            school_repo,
            clock,
            jwt_secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    fn user_to_info(&self, user: &school_service_core::domains::school_admin::User) -> UserInfo {
        UserInfo {
            id: user.id,
            tenant_id: user.school_id,
            username: user.username.clone(),
            role: user.role.clone(),
            must_reset_password: user.must_reset_password,
        }
    }

    fn issue_tokens(
        &self,
        user: &school_service_core::domains::school_admin::User,
    ) -> Result<(String, String), AppError> {
        let now = self.clock.now();
        let access = Claims::new_access(
            user.id,
            user.school_id,
            user.role.clone(),
            user.username.clone(),
            self.access_ttl_seconds,
            now,
        );
        let refresh = Claims::new_refresh(
            user.id,
            user.school_id,
            user.role.clone(),
            user.username.clone(),
            self.refresh_ttl_seconds,
            now,
        );

        Ok((
            encode_jwt(&access, &self.jwt_secret)?,
            encode_jwt(&refresh, &self.jwt_secret)?,
        ))
    }

    /// Re-checks everything a token alone can't guarantee: the account
    /// is still active, and — unless the caller is platform_admin — its
    /// school is still active too.
    async fn assert_still_usable(
        &self,
        user: &school_service_core::domains::school_admin::User,
    ) -> Result<(), AppError> {
        if !user.active {
            return Err(AppError::AccountInactive);
        }
        if let Some(school_id) = user.school_id {
            let school = self
                .school_repo
                .find_by_id(school_id)
                .await?
                .ok_or(AppError::AccountInactive)?;
            if !school.active {
                return Err(AppError::SchoolInactive);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, req: LoginReq) -> Result<AuthResp, AppError> {
        let user = self
            .user_repo
            .find_by_username(&req.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = bcrypt::verify(&req.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.assert_still_usable(&user).await?;

        let (access_token, refresh_token) = self.issue_tokens(&user)?;

        Ok(AuthResp {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_seconds,
            user: self.user_to_info(&user),
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResp, AppError> {
        let claims = decode_jwt(refresh_token, &self.jwt_secret, TokenType::Refresh)?;

        let user = match claims.tenant_id {
            Some(tenant_id) => self.user_repo.find_by_id(claims.sub, tenant_id).await?,
            None => self.user_repo.find_by_username(&claims.username).await?,
        }
        .ok_or(AppError::InvalidToken)?;

        self.assert_still_usable(&user).await?;

        let (access_token, refresh_token) = self.issue_tokens(&user)?;

        Ok(AuthResp {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_seconds,
            user: self.user_to_info(&user),
        })
    }

    async fn change_password(&self, user_id: Uuid, req: ChangePasswordReq) -> Result<(), AppError> {
        let user = self
            .find_user_by_id_any_tenant(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let valid = bcrypt::verify(&req.old_password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let mut updated = user;
        updated.password_hash = bcrypt::hash(&req.new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;
        updated.must_reset_password = false;
        updated.updated_at = self.clock.now();

        self.user_repo.update(&updated).await?;
        Ok(())
    }

    async fn me(&self, user_id: Uuid, tenant_id: Option<Uuid>) -> Result<UserInfo, AppError> {
        let user = match tenant_id {
            Some(tenant_id) => self.user_repo.find_by_id(user_id, tenant_id).await?,
            None => self.find_user_by_id_any_tenant(user_id).await?,
        }
        .ok_or(AppError::NotFound("user"))?;

        Ok(self.user_to_info(&user))
    }
}

impl AuthServiceImpl {
    /// `UserRepository::find_by_id` requires a tenant id by design (no
    /// cross-tenant reads); platform_admin has none, so its own lookup
    /// goes through the dedicated tenant-less accessor instead.
    async fn find_user_by_id_any_tenant(
        &self,
        user_id: Uuid,
    ) -> Result<Option<school_service_core::domains::school_admin::User>, AppError> {
        self.user_repo.find_by_id_platform_admin(user_id).await
    }
}
