use axum::extract::State;
use axum::Json;
use school_service_core::domains::attendance::Attendance;
use school_service_core::dto::{AttendanceResp, ManualAttendanceReq, RfidEventReq};
use shared_auth::extractors::DeviceContext;
use shared_auth::{authorize, Capability, TenantContext};
use shared_context::Role;
use shared_error::AppError;
use validator::Validate;

use crate::response::ApiResponse;
use crate::state::AppState;

fn to_resp(a: Attendance) -> AttendanceResp {
    AttendanceResp {
        id: a.id,
        student_id: a.student_id,
        schedule_id: a.schedule_id,
        date: a.date,
        check_in_time: a.check_in_time,
        check_out_time: a.check_out_time,
        status: a.status.as_str().to_string(),
        method: match a.method {
            school_service_core::domains::attendance::AttendanceMethod::Rfid => "rfid".to_string(),
            school_service_core::domains::attendance::AttendanceMethod::Manual => "manual".to_string(),
        },
    }
}

/// Device-credential ingress (spec §6 "Device credential"): the
/// `DeviceContext` extractor already authenticated `device_code`/
/// `api_key` before this handler runs, but the RFID tap itself is re-
/// authenticated inside the service (it needs the device row again to
/// resolve `rfid_code` against the right tenant).
pub async fn rfid(
    State(state): State<AppState>,
    _device: DeviceContext,
    Json(payload): Json<RfidEventReq>,
) -> Result<ApiResponse<AttendanceResp>, AppError> {
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let attendance = state
        .attendance_service
        .ingest_rfid(&payload.device_code, &payload.api_key, &payload.rfid_code, payload.device_timestamp)
        .await?;

    Ok(ApiResponse::created(to_resp(attendance)))
}

pub async fn manual(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<ManualAttendanceReq>,
) -> Result<ApiResponse<AttendanceResp>, AppError> {
    authorize(tenant.ctx.role, Capability::SubmitManualAttendance)?;

    if tenant.ctx.role == Role::HomeroomTeacher {
        let student = state
            .student_repo
            .find_by_id(payload.student_id, tenant.tenant_id)
            .await?
            .ok_or(AppError::NotFound("student"))?;
        let class = state
            .class_repo
            .find_by_homeroom_teacher(tenant.tenant_id, tenant.ctx.user_id)
            .await?
            .ok_or(AppError::ClassMismatch)?;
        if student.class_id != class.id {
            return Err(AppError::ClassMismatch);
        }
    }

    let attendance = state
        .attendance_service
        .ingest_manual(
            tenant.tenant_id,
            payload.student_id,
            payload.date,
            &payload.status,
            payload.check_in_time,
            payload.check_out_time,
        )
        .await?;

    Ok(ApiResponse::created(to_resp(attendance)))
}
