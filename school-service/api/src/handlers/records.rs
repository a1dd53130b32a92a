use axum::extract::{Path, State};
use axum::Json;
use school_service_core::domains::notification::NotificationType;
use school_service_core::domains::records::{
    Achievement, CounselingNote, Grade, HomeroomNote, PermitDocument, PermitStatus, Violation,
};
use school_service_core::dto::{
    AchievementResp, CounselingNoteResp, CreateAchievementReq, CreateCounselingNoteReq,
    CreateGradeReq, CreateHomeroomNoteReq, CreatePermitReq, CreateViolationReq, GradeResp,
    HomeroomNoteResp, PermitResp, UpdatePermitStatusReq, ViolationResp,
};
use shared_auth::{authorize, Capability, TenantContext};
use shared_context::Role;
use shared_error::AppError;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::response::{ApiAck, ApiResponse};
use crate::state::AppState;

/// Row-level check the capability matrix can't express (spec §4.3(c)):
/// a homeroom_teacher may only touch students in the one class they're
/// assigned to.
async fn assert_teacher_owns_student(
    state: &AppState,
    tenant_id: Uuid,
    teacher_user_id: Uuid,
    student_id: Uuid,
) -> Result<(), AppError> {
    let student = state
        .student_repo
        .find_by_id(student_id, tenant_id)
        .await?
        .ok_or(AppError::NotFound("student"))?;
    let class = state
        .class_repo
        .find_by_homeroom_teacher(tenant_id, teacher_user_id)
        .await?
        .ok_or(AppError::ClassMismatch)?;
    if student.class_id != class.id {
        return Err(AppError::ClassMismatch);
    }
    Ok(())
}

/// Row-level read gate (spec §4.3): school_admin/counselor read any
/// student in the tenant, homeroom_teacher is scoped to their class,
/// parent is scoped to linked students (§4.3(d)), student is scoped to
/// their own record. Any other role has no record-read path at all.
async fn assert_can_read_student(
    state: &AppState,
    tenant: &TenantContext,
    student_id: Uuid,
) -> Result<(), AppError> {
    if authorize(tenant.ctx.role, Capability::ReadAllStudentsInTenant).is_ok() {
        return Ok(());
    }
    match tenant.ctx.role {
        Role::HomeroomTeacher => {
            assert_teacher_owns_student(state, tenant.tenant_id, tenant.ctx.user_id, student_id).await
        }
        Role::Parent => {
            let linked = state
                .parent_link_repo
                .is_linked(tenant.tenant_id, tenant.ctx.user_id, student_id)
                .await?;
            if linked {
                Ok(())
            } else {
                Err(AppError::NotLinked)
            }
        }
        Role::Student => {
            let student = state
                .student_repo
                .find_by_id(student_id, tenant.tenant_id)
                .await?
                .ok_or(AppError::NotFound("student"))?;
            if student.user_id == Some(tenant.ctx.user_id) {
                Ok(())
            } else {
                Err(AppError::Forbidden(format!(
                    "role '{}' cannot read this student's records",
                    tenant.ctx.role
                )))
            }
        }
        other => Err(AppError::Forbidden(format!("role '{other}' cannot read student records"))),
    }
}

/// Everyone a change to `student_id` should notify: both linked
/// parents, the student's own login (if they have one), and the
/// class's homeroom teacher (spec §4.8).
async fn recipients_for_student(
    state: &AppState,
    tenant_id: Uuid,
    student_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    let student = state
        .student_repo
        .find_by_id(student_id, tenant_id)
        .await?
        .ok_or(AppError::NotFound("student"))?;

    let mut recipients = state.parent_link_repo.parents_for_student(tenant_id, student_id).await?;
    if let Some(user_id) = student.user_id {
        recipients.push(user_id);
    }
    if let Some(class) = state.class_repo.find_by_id(student.class_id, tenant_id).await? {
        if let Some(teacher_id) = class.homeroom_teacher_id {
            recipients.push(teacher_id);
        }
    }
    Ok(recipients)
}

pub async fn create_grade(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateGradeReq>,
) -> Result<ApiResponse<GradeResp>, AppError> {
    authorize(tenant.ctx.role, Capability::WriteOwnClassRecords)?;
    assert_teacher_owns_student(&state, tenant.tenant_id, tenant.ctx.user_id, payload.student_id).await?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let grade = state
        .grade_repo
        .create(&Grade {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            subject: payload.subject.clone(),
            term: payload.term.clone(),
            score: payload.score,
            notes: payload.notes.clone(),
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewGrade,
            "New grade recorded",
            &format!("{}: {}", grade.subject, grade.score),
            HashMap::from([("grade_id".to_string(), serde_json::json!(grade.id))]),
        )
        .await?;

    Ok(ApiResponse::created(GradeResp {
        id: grade.id,
        student_id: grade.student_id,
        subject: grade.subject,
        term: grade.term,
        score: grade.score,
        notes: grade.notes,
    }))
}

pub async fn list_grades(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<GradeResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let grades = state.grade_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(
        grades
            .into_iter()
            .map(|g| GradeResp {
                id: g.id,
                student_id: g.student_id,
                subject: g.subject,
                term: g.term,
                score: g.score,
                notes: g.notes,
            })
            .collect(),
    ))
}

pub async fn create_homeroom_note(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateHomeroomNoteReq>,
) -> Result<ApiResponse<HomeroomNoteResp>, AppError> {
    authorize(tenant.ctx.role, Capability::WriteOwnClassRecords)?;
    assert_teacher_owns_student(&state, tenant.tenant_id, tenant.ctx.user_id, payload.student_id).await?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let note = state
        .homeroom_note_repo
        .create(&HomeroomNote {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            body: payload.body.clone(),
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewHomeroomNote,
            "New homeroom note",
            &note.body,
            HashMap::from([("note_id".to_string(), serde_json::json!(note.id))]),
        )
        .await?;

    Ok(ApiResponse::created(HomeroomNoteResp { id: note.id, student_id: note.student_id, body: note.body }))
}

pub async fn list_homeroom_notes(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<HomeroomNoteResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let notes = state.homeroom_note_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(
        notes.into_iter().map(|n| HomeroomNoteResp { id: n.id, student_id: n.student_id, body: n.body }).collect(),
    ))
}

pub async fn create_counseling_note(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateCounselingNoteReq>,
) -> Result<ApiResponse<CounselingNoteResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageCounseling)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let note = state
        .counseling_note_repo
        .create(&CounselingNote {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            internal_note: payload.internal_note.clone(),
            parent_summary: payload.parent_summary.clone(),
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewCounselingNote,
            "New counseling note",
            &note.parent_summary,
            HashMap::from([("note_id".to_string(), serde_json::json!(note.id))]),
        )
        .await?;

    Ok(ApiResponse::created(CounselingNoteResp {
        id: note.id,
        student_id: note.student_id,
        internal_note: note.internal_note,
        parent_summary: note.parent_summary,
    }))
}

/// Strips `internal_note` unless the caller holds
/// `ReadCounselingInternal` (spec §4.3(b)).
pub async fn list_counseling_notes(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<CounselingNoteResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let can_read_internal = authorize(tenant.ctx.role, Capability::ReadCounselingInternal).is_ok();

    let notes = state.counseling_note_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(
        notes
            .into_iter()
            .map(|n| CounselingNoteResp {
                id: n.id,
                student_id: n.student_id,
                internal_note: if can_read_internal { n.internal_note } else { None },
                parent_summary: n.parent_summary,
            })
            .collect(),
    ))
}

fn parse_permit_status(s: &str) -> Result<PermitStatus, AppError> {
    match s.to_ascii_lowercase().as_str() {
        "pending" => Ok(PermitStatus::Pending),
        "approved" => Ok(PermitStatus::Approved),
        "denied" => Ok(PermitStatus::Denied),
        other => Err(AppError::InvalidValue(format!("unknown permit status '{other}'"))),
    }
}

fn permit_status_str(status: PermitStatus) -> &'static str {
    match status {
        PermitStatus::Pending => "pending",
        PermitStatus::Approved => "approved",
        PermitStatus::Denied => "denied",
    }
}

fn permit_resp(p: PermitDocument) -> PermitResp {
    PermitResp { id: p.id, student_id: p.student_id, reason: p.reason, permit_date: p.permit_date, status: permit_status_str(p.status).to_string() }
}

pub async fn create_permit(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreatePermitReq>,
) -> Result<ApiResponse<PermitResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageCounseling)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let permit = state
        .permit_repo
        .create(&PermitDocument {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            reason: payload.reason.clone(),
            permit_date: payload.permit_date,
            status: PermitStatus::Pending,
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewPermit,
            "New permit request",
            &permit.reason,
            HashMap::from([("permit_id".to_string(), serde_json::json!(permit.id))]),
        )
        .await?;

    Ok(ApiResponse::created(permit_resp(permit)))
}

pub async fn update_permit_status(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path((student_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePermitStatusReq>,
) -> Result<ApiResponse<PermitResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageCounseling)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let existing = state
        .permit_repo
        .list_for_student(tenant.tenant_id, student_id)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(AppError::NotFound("permit"))?;

    let updated = state
        .permit_repo
        .update(&PermitDocument { status: parse_permit_status(&payload.status)?, ..existing })
        .await?;

    Ok(ApiResponse::ok(permit_resp(updated)))
}

pub async fn list_permits(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<PermitResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let permits = state.permit_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(permits.into_iter().map(permit_resp).collect()))
}

pub async fn create_violation(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateViolationReq>,
) -> Result<ApiResponse<ViolationResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageCounseling)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let violation = state
        .violation_repo
        .create(&Violation {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            category: payload.category.clone(),
            description: payload.description.clone(),
            points: payload.points,
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewViolation,
            "New violation recorded",
            &violation.description,
            HashMap::from([("violation_id".to_string(), serde_json::json!(violation.id))]),
        )
        .await?;

    Ok(ApiResponse::created(ViolationResp {
        id: violation.id,
        student_id: violation.student_id,
        category: violation.category,
        description: violation.description,
        points: violation.points,
    }))
}

pub async fn list_violations(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<ViolationResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let violations = state.violation_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(
        violations
            .into_iter()
            .map(|v| ViolationResp { id: v.id, student_id: v.student_id, category: v.category, description: v.description, points: v.points })
            .collect(),
    ))
}

pub async fn create_achievement(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateAchievementReq>,
) -> Result<ApiResponse<AchievementResp>, AppError> {
    authorize(tenant.ctx.role, Capability::ManageCounseling)?;
    payload.validate().map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let achievement = state
        .achievement_repo
        .create(&Achievement {
            id: Uuid::new_v4(),
            school_id: tenant.tenant_id,
            student_id: payload.student_id,
            created_by_user_id: tenant.ctx.user_id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            points: payload.points,
            created_at: state.clock.now(),
        })
        .await?;

    let recipients = recipients_for_student(&state, tenant.tenant_id, payload.student_id).await?;
    state
        .notification_service
        .notify(
            &recipients,
            NotificationType::NewAchievement,
            "New achievement recorded",
            &achievement.title,
            HashMap::from([("achievement_id".to_string(), serde_json::json!(achievement.id))]),
        )
        .await?;

    Ok(ApiResponse::created(AchievementResp {
        id: achievement.id,
        student_id: achievement.student_id,
        title: achievement.title,
        description: achievement.description,
        points: achievement.points,
    }))
}

pub async fn list_achievements(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<AchievementResp>>, AppError> {
    assert_can_read_student(&state, &tenant, student_id).await?;
    let achievements = state.achievement_repo.list_for_student(tenant.tenant_id, student_id).await?;
    Ok(ApiResponse::ok(
        achievements
            .into_iter()
            .map(|a| AchievementResp { id: a.id, student_id: a.student_id, title: a.title, description: a.description, points: a.points })
            .collect(),
    ))
}
