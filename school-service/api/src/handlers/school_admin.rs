use axum::extract::{Path, State};
use axum::Json;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use school_service_core::domains::school_admin::{Class, Device, ParentStudentLink, School, Student, User};
use school_service_core::dto::{
    ClassResp, CreateClassReq, CreateDeviceReq, CreateStudentReq, CreateUserReq, DeviceResp,
    LinkParentReq, SchoolResp, StudentResp, UpdateSchoolReq, UpdateStudentReq, UpdateUserReq,
    UserResp,
};
use sha2::{Digest, Sha256};
use shared_auth::{authorize, Capability, TenantContext};
use shared_context::Role;
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

/// Matches the entropy/encoding `DisplayTokenServiceImpl` uses for its
/// own secrets (infra/src/services/display_token_service.rs): 32
/// random bytes, URL-safe base64, SHA-256 for the stored hash.
fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_api_key(api_key: &str) -> String {
    format!("{:x}", Sha256::digest(api_key.as_bytes()))
}

fn school_resp(s: School) -> SchoolResp {
    SchoolResp { id: s.id, name: s.name, contact_email: s.contact_email, contact_phone: s.contact_phone, timezone: s.timezone, active: s.active }
}

pub async fn get_school(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiResponse<SchoolResp>, AppError> {
    let school = state.school_repo.find_by_id(tenant.tenant_id).await?.ok_or(AppError::NotFound("school"))?;
    Ok(ApiResponse::ok(school_resp(school)))
}

pub async fn update_school(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<UpdateSchoolReq>,
) -> Result<ApiResponse<SchoolResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchools)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let existing = state.school_repo.find_by_id(tenant.tenant_id).await?.ok_or(AppError::NotFound("school"))?;
    let updated = state
        .school_repo
        .update(&School {
            name: payload.name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            timezone: payload.timezone,
            updated_at: state.clock.now(),
            ..existing
        })
        .await?;
    Ok(ApiResponse::ok(school_resp(updated)))
}

fn user_resp(u: User) -> UserResp {
    UserResp { id: u.id, tenant_id: u.school_id, username: u.username, role: u.role, active: u.active, must_reset_password: u.must_reset_password }
}

pub async fn create_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateUserReq>,
) -> Result<ApiResponse<UserResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageTenantUsers)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    if Role::parse(&payload.role).is_none() {
        return Err(AppError::InvalidValue(format!("unknown role '{}'", payload.role)));
    }
    if state.user_repo.username_exists(&payload.username).await? {
        return Err(AppError::Duplicate("username".into()));
    }
    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

    let now = state.clock.now();
    let user = state
        .user_repo
        .create(&User {
            id: Uuid::new_v4(),
            school_id: Some(tenant.tenant_id),
            role: payload.role,
            username: payload.username,
            password_hash,
            must_reset_password: true,
            active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ApiResponse::created(user_resp(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserReq>,
) -> Result<ApiResponse<UserResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageTenantUsers)?;

    let mut existing = state.user_repo.find_by_id(id, tenant.tenant_id).await?.ok_or(AppError::NotFound("user"))?;
    if let Some(active) = payload.active {
        existing.active = active;
    }
    if let Some(must_reset) = payload.must_reset_password {
        existing.must_reset_password = must_reset;
    }
    existing.updated_at = state.clock.now();

    let updated = state.user_repo.update(&existing).await?;
    Ok(ApiResponse::ok(user_resp(updated)))
}

pub async fn list_users(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiResponse<Vec<UserResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageTenantUsers)?;
    let users = state.user_repo.list(tenant.tenant_id, None).await?;
    Ok(ApiResponse::ok(users.into_iter().map(user_resp).collect()))
}

fn class_resp(c: Class) -> ClassResp {
    ClassResp { id: c.id, name: c.name, grade: c.grade, academic_year: c.academic_year, homeroom_teacher_id: c.homeroom_teacher_id }
}

pub async fn create_class(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateClassReq>,
) -> Result<ApiResponse<ClassResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageClasses)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    if state
        .class_repo
        .exists_name_year(tenant.tenant_id, &payload.name, &payload.academic_year, None)
        .await?
    {
        return Err(AppError::Duplicate("class name/academic_year".into()));
    }

    let now = state.clock.now();
    let class = state
        .class_repo
        .create(&Class {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            name: payload.name,
            grade: payload.grade,
            academic_year: payload.academic_year,
            homeroom_teacher_id: payload.homeroom_teacher_id,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ApiResponse::created(class_resp(class)))
}

pub async fn update_class(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateClassReq>,
) -> Result<ApiResponse<ClassResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageClasses)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let existing = state.class_repo.find_by_id(id, tenant.tenant_id).await?.ok_or(AppError::NotFound("class"))?;
    if state
        .class_repo
        .exists_name_year(tenant.tenant_id, &payload.name, &payload.academic_year, Some(id))
        .await?
    {
        return Err(AppError::Duplicate("class name/academic_year".into()));
    }

    let updated = state
        .class_repo
        .update(&Class {
            name: payload.name,
            grade: payload.grade,
            academic_year: payload.academic_year,
            homeroom_teacher_id: payload.homeroom_teacher_id,
            updated_at: state.clock.now(),
            ..existing
        })
        .await?;

    Ok(ApiResponse::ok(class_resp(updated)))
}

pub async fn delete_class(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiAck, AppError> {
    authorize(tenant.ctx.role, Capability::ManageClasses)?;
    state.class_repo.delete(id, tenant.tenant_id).await?;
    Ok(ApiAck)
}

pub async fn list_classes(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiResponse<Vec<ClassResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageClasses)?;
    let classes = state.class_repo.list(tenant.tenant_id).await?;
    Ok(ApiResponse::ok(classes.into_iter().map(class_resp).collect()))
}

fn student_resp(s: Student) -> StudentResp {
    StudentResp { id: s.id, class_id: s.class_id, nis: s.nis, nisn: s.nisn, name: s.name, rfid_code: s.rfid_code, user_id: s.user_id, active: s.active }
}

pub async fn create_student(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateStudentReq>,
) -> Result<ApiResponse<StudentResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageStudents)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    state.class_repo.find_by_id(payload.class_id, tenant.tenant_id).await?.ok_or(AppError::NotFound("class"))?;

    let now = state.clock.now();
    let student = state
        .student_repo
        .create(&Student {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            class_id: payload.class_id,
            nis: payload.nis,
            nisn: payload.nisn,
            name: payload.name,
            rfid_code: payload.rfid_code,
            user_id: payload.user_id,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ApiResponse::created(student_resp(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentReq>,
) -> Result<ApiResponse<StudentResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageStudents)?;

    let existing = state.student_repo.find_by_id(id, tenant.tenant_id).await?.ok_or(AppError::NotFound("student"))?;
    state.class_repo.find_by_id(payload.class_id, tenant.tenant_id).await?.ok_or(AppError::NotFound("class"))?;

    let updated = state
        .student_repo
        .update(&Student {
            name: payload.name,
            class_id: payload.class_id,
            rfid_code: payload.rfid_code,
            active: payload.active,
            updated_at: state.clock.now(),
            ..existing
        })
        .await?;

    Ok(ApiResponse::ok(student_resp(updated)))
}

pub async fn list_students_by_class(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(class_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<StudentResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ReadAllStudentsInTenant)?;
    let students = state.student_repo.list_by_class(tenant.tenant_id, class_id).await?;
    Ok(ApiResponse::ok(students.into_iter().map(student_resp).collect()))
}

pub async fn link_parent(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<LinkParentReq>,
) -> Result<ApiAck, AppError> {
    authorize(tenant.ctx.role, Capability::ManageParentLinks)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    state
        .parent_link_repo
        .link(&ParentStudentLink {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            parent_user_id: payload.parent_user_id,
            student_id: payload.student_id,
            created_at: state.clock.now(),
        })
        .await?;

    Ok(ApiAck)
}

pub async fn unlink_parent(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path((parent_user_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiAck, AppError> {
    authorize(tenant.ctx.role, Capability::ManageParentLinks)?;
    state.parent_link_repo.unlink(tenant.tenant_id, parent_user_id, student_id).await?;
    Ok(ApiAck)
}

fn device_resp(d: Device, api_key: Option<String>) -> DeviceResp {
    DeviceResp { id: d.id, device_code: d.device_code, name: d.name, active: d.active, api_key }
}

/// `Capability::ManageDevices` is platform_admin-only — a school never
/// provisions its own readers, it requests one from the platform
/// operator (spec §4.6, §6 "Device credential").
pub async fn create_device(
    State(state): State<AppState>,
    ctx: shared_auth::Context,
    Path(school_id): Path<Uuid>,
    Json(payload): Json<CreateDeviceReq>,
) -> Result<ApiResponse<DeviceResp>, AppError> {
    authorize(ctx.role, Capability::ManageDevices)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let api_key = generate_api_key();
    let api_key_hash = hash_api_key(&api_key);

    let now = state.clock.now();
    let device = state
        .device_repo
        .create(&Device {
            id: Uuid::new_v4(),
            school_id,
            device_code: payload.device_code,
            api_key_hash,
            name: payload.name,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ApiResponse::created(device_resp(device, Some(api_key))))
}

pub async fn rotate_device_key(
    State(state): State<AppState>,
    ctx: shared_auth::Context,
    Path(device_code): Path<String>,
) -> Result<ApiResponse<DeviceResp>, AppError> {
    authorize(ctx.role, Capability::ManageDevices)?;

    let mut existing = state.device_repo.find_by_device_code(&device_code).await?.ok_or(AppError::NotFound("device"))?;
    let api_key = generate_api_key();
    existing.api_key_hash = hash_api_key(&api_key);
    existing.updated_at = state.clock.now();

    let updated = state.device_repo.update(&existing).await?;
    Ok(ApiResponse::ok(device_resp(updated, Some(api_key))))
}

pub async fn list_devices(
    State(state): State<AppState>,
    ctx: shared_auth::Context,
    Path(school_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<DeviceResp>>, AppError> {
    authorize(ctx.role, Capability::ManageDevices)?;
    let devices = state.device_repo.list(school_id).await?;
    Ok(ApiResponse::ok(devices.into_iter().map(|d| device_resp(d, None)).collect()))
}
