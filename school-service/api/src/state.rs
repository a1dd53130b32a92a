//! Shared application state (C11), grounded on
//! `services/inventory_service/api/src/state.rs`: a concrete struct of
//! `Arc<dyn Trait>` service handles rather than the single-service
//! generic `AppState<S: AuthService>` the smaller `user_service` uses —
//! this crate wires six-plus services, not one, so a generic parameter
//! per service would make every handler signature unreadable.

use std::sync::Arc;

use school_service_core::repositories::{
    AchievementRepository, ClassRepository, CounselingNoteRepository, DeviceRepository,
    DisplayTokenRepository, GradeRepository, HomeroomNoteRepository, NotificationRepository,
    ParentStudentLinkRepository, PermitDocumentRepository, PlatformAdminRepository,
    PushRegistrationRepository, SchoolRepository, StudentRepository, UserRepository,
    ViolationRepository,
};
use school_service_core::services::{
    AttendanceIngressService, AuthService, DisplayTokenService, NotificationService,
    ScheduleService,
};
use shared_auth::extractors::{DeviceAuthenticator, DeviceContext};
use shared_auth::middleware::{JwtSecretProvider, UserStatus, UserStatusProvider};
use shared_context::Clock;
use shared_error::AppError;
use uuid::Uuid;

use school_service_infra::live_feed::LiveFeedHub;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub schedule_service: Arc<dyn ScheduleService>,
    pub attendance_service: Arc<dyn AttendanceIngressService>,
    pub display_token_service: Arc<dyn DisplayTokenService>,
    pub notification_service: Arc<dyn NotificationService>,

    pub school_repo: Arc<dyn SchoolRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub class_repo: Arc<dyn ClassRepository>,
    pub student_repo: Arc<dyn StudentRepository>,
    pub parent_link_repo: Arc<dyn ParentStudentLinkRepository>,
    pub device_repo: Arc<dyn DeviceRepository>,
    pub display_token_repo: Arc<dyn DisplayTokenRepository>,
    pub platform_admin_repo: Arc<dyn PlatformAdminRepository>,

    pub notification_repo: Arc<dyn NotificationRepository>,
    pub push_registration_repo: Arc<dyn PushRegistrationRepository>,

    pub grade_repo: Arc<dyn GradeRepository>,
    pub homeroom_note_repo: Arc<dyn HomeroomNoteRepository>,
    pub counseling_note_repo: Arc<dyn CounselingNoteRepository>,
    pub permit_repo: Arc<dyn PermitDocumentRepository>,
    pub violation_repo: Arc<dyn ViolationRepository>,
    pub achievement_repo: Arc<dyn AchievementRepository>,

    pub live_feed: Arc<LiveFeedHub>,
    pub device_authenticator: Arc<dyn DeviceAuthenticator + Send + Sync>,
    pub clock: Arc<dyn Clock>,
    pub jwt_secret: String,
}

impl JwtSecretProvider for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

#[async_trait::async_trait]
impl UserStatusProvider for AppState {
    async fn user_status(&self, user_id: Uuid) -> Result<UserStatus, AppError> {
        let user = self
            .user_repo
            .find_by_id_any(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let school_active = match user.school_id {
            Some(school_id) => self
                .school_repo
                .find_by_id(school_id)
                .await?
                .map(|s| s.active)
                .unwrap_or(false),
            None => true,
        };

        Ok(UserStatus {
            active: user.active,
            school_active,
            must_reset_password: user.must_reset_password,
        })
    }
}

#[async_trait::async_trait]
impl DeviceAuthenticator for AppState {
    async fn authenticate_device(
        &self,
        device_code: &str,
        api_key: &str,
    ) -> Result<DeviceContext, AppError> {
        self.device_authenticator.authenticate_device(device_code, api_key).await
    }
}
