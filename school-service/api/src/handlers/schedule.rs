use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDateTime, NaiveTime, Weekday};
use school_service_core::domains::schedule::{AttendanceSchedule, DaysOfWeek};
use school_service_core::dto::{CreateScheduleReq, ScheduleResp};
use shared_auth::{authorize, Capability, TenantContext};
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

fn parse_weekday(s: &str) -> Result<Weekday, AppError> {
    match s.to_ascii_lowercase().as_str() {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        other => Err(AppError::InvalidValue(format!("unknown weekday '{other}'"))),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn days_to_vec(days: DaysOfWeek) -> Vec<String> {
    [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun]
        .into_iter()
        .filter(|d| days.contains(*d))
        .map(|d| weekday_name(d).to_string())
        .collect()
}

fn to_resp(s: AttendanceSchedule) -> ScheduleResp {
    ScheduleResp {
        id: s.id,
        name: s.name,
        start_time: s.start_time.format("%H:%M").to_string(),
        end_time: s.end_time.format("%H:%M").to_string(),
        late_threshold_minutes: s.late_threshold_minutes,
        very_late_threshold_minutes: s.very_late_threshold_minutes,
        days_of_week: days_to_vec(s.days_of_week),
        active: s.active,
        is_default: s.is_default,
    }
}

fn req_to_schedule(
    id: Uuid,
    tenant_id: Uuid,
    req: CreateScheduleReq,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<AttendanceSchedule, AppError> {
    let start_time = NaiveTime::parse_from_str(&req.start_time, "%H:%M")
        .map_err(|_| AppError::InvalidFormat("start_time".into()))?;
    let end_time = NaiveTime::parse_from_str(&req.end_time, "%H:%M")
        .map_err(|_| AppError::InvalidFormat("end_time".into()))?;

    let mut days = DaysOfWeek::empty();
    for day in &req.days_of_week {
        days = days.with(parse_weekday(day)?);
    }

    Ok(AttendanceSchedule {
        id,
        school_id: tenant_id,
        name: req.name,
        start_time,
        end_time,
        late_threshold_minutes: req.late_threshold_minutes,
        very_late_threshold_minutes: req.very_late_threshold_minutes,
        days_of_week: days,
        active: true,
        is_default: req.is_default,
        created_at: now,
        updated_at: now,
    })
}

pub async fn create(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateScheduleReq>,
) -> Result<ApiResponse<ScheduleResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let schedule = req_to_schedule(Uuid::new_v4(), tenant.tenant_id, payload, state.clock.now())?;
    let created = state.schedule_service.create(tenant.tenant_id, schedule).await?;
    Ok(ApiResponse::created(to_resp(created)))
}

pub async fn update(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateScheduleReq>,
) -> Result<ApiResponse<ScheduleResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let schedule = req_to_schedule(id, tenant.tenant_id, payload, state.clock.now())?;
    let updated = state.schedule_service.update(tenant.tenant_id, schedule).await?;
    Ok(ApiResponse::ok(to_resp(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiAck, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    state.schedule_service.delete(tenant.tenant_id, id).await?;
    Ok(ApiAck)
}

pub async fn set_default(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<ScheduleResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    let updated = state.schedule_service.set_default(tenant.tenant_id, id).await?;
    Ok(ApiResponse::ok(to_resp(updated)))
}

pub async fn list(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiResponse<Vec<ScheduleResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    let schedules = state.schedule_service.list(tenant.tenant_id).await?;
    Ok(ApiResponse::ok(schedules.into_iter().map(to_resp).collect()))
}

#[derive(serde::Deserialize)]
pub struct ActiveQuery {
    pub at: Option<NaiveDateTime>,
}

pub async fn active(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ActiveQuery>,
) -> Result<ApiResponse<Option<ScheduleResp>>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageSchedules)?;
    let at = query.at.unwrap_or_else(|| state.clock.now().naive_utc());
    let active = state.schedule_service.active_at(tenant.tenant_id, at).await?;
    Ok(ApiResponse::ok(active.map(to_resp)))
}
