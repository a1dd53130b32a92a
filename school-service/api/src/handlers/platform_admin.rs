use axum::extract::{Path, State};
use axum::Json;
use school_service_core::domains::school_admin::{School, User};
use school_service_core::dto::{CreateSchoolReq, SchoolResp, SetSchoolActiveReq};
use shared_auth::Context as RequestContext;
use shared_auth::{authorize, Capability};
use shared_context::Role;
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

fn to_resp(s: School) -> SchoolResp {
    SchoolResp { id: s.id, name: s.name, contact_email: s.contact_email, contact_phone: s.contact_phone, timezone: s.timezone, active: s.active }
}

/// Creates the tenant and its seed `school_admin` login in one call
/// (spec §4.4); no separate endpoint ever creates a school without an
/// admin attached to it.
pub async fn create_school(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateSchoolReq>,
) -> Result<ApiResponse<SchoolResp>, AppError> {
    authorize(ctx.role, Capability::ManageSchools)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let now = state.clock.now();
    let school = state
        .platform_admin_repo
        .create_school(&School {
            id: Uuid::new_v4(),
            name: payload.name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            timezone: payload.timezone,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    if state.user_repo.username_exists(&payload.admin_username).await? {
        return Err(AppError::Duplicate("username".into()));
    }
    let password_hash = bcrypt::hash(&payload.admin_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

    state
        .user_repo
        .create(&User {
            id: Uuid::new_v4(),
            school_id: Some(school.id),
            role: Role::SchoolAdmin.as_str().to_string(),
            username: payload.admin_username,
            password_hash,
            must_reset_password: true,
            active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ApiResponse::created(to_resp(school)))
}

pub async fn list_schools(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<ApiResponse<Vec<SchoolResp>>, AppError> {
    authorize(ctx.role, Capability::ManageSchools)?;
    let schools = state.platform_admin_repo.list_schools().await?;
    Ok(ApiResponse::ok(schools.into_iter().map(to_resp).collect()))
}

pub async fn set_school_active(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetSchoolActiveReq>,
) -> Result<ApiResponse<SchoolResp>, AppError> {
    authorize(ctx.role, Capability::ManageSchools)?;
    let school = state.platform_admin_repo.set_school_active(id, payload.active).await?;
    Ok(ApiResponse::ok(to_resp(school)))
}

pub async fn delete_school(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiAck, AppError> {
    authorize(ctx.role, Capability::ManageSchools)?;
    state.platform_admin_repo.delete_school_cascade(id).await?;
    Ok(ApiAck)
}
