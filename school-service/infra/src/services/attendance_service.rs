//! Attendance ingress (C6): the RFID and manual paths funnel through
//! the same upsert-by-`(student_id, date)` rule (spec §4.6), and both
//! end by handing off to `NotificationService` for late/very_late/
//! absent classifications. Grounded on the teacher's layering (a thin
//! service orchestrating several single-purpose repositories) rather
//! than any one specific file — this domain has no direct teacher
//! analogue.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use school_service_core::domains::attendance::{Attendance, AttendanceMethod, DEFAULT_CHECKOUT_MIN_GAP_MINUTES};
use school_service_core::domains::notification::NotificationType;
use school_service_core::domains::schedule::engine::{classify, resolve_active_schedule};
use school_service_core::domains::schedule::AttendanceStatus;
use school_service_core::repositories::{
    AttendanceRepository, ClassRepository, ParentStudentLinkRepository, ScheduleRepository,
    SchoolRepository, StudentRepository,
};
use school_service_core::services::{AttendanceIngressService, NotificationService};
use shared_auth::extractors::DeviceAuthenticator;
use shared_context::Clock;
use shared_error::AppError;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

pub struct AttendanceIngressServiceImpl {
    device_authenticator: Arc<dyn DeviceAuthenticator + Send + Sync>,
    school_repo: Arc<dyn SchoolRepository>,
    student_repo: Arc<dyn StudentRepository>,
    class_repo: Arc<dyn ClassRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    attendance_repo: Arc<dyn AttendanceRepository>,
    parent_link_repo: Arc<dyn ParentStudentLinkRepository>,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
    checkout_min_gap_minutes: i64,
}

impl AttendanceIngressServiceImpl {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device_authenticator: Arc<dyn DeviceAuthenticator + Send + Sync>,
        school_repo: Arc<dyn SchoolRepository>,
        student_repo: Arc<dyn StudentRepository>,
        class_repo: Arc<dyn ClassRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        attendance_repo: Arc<dyn AttendanceRepository>,
        parent_link_repo: Arc<dyn ParentStudentLinkRepository>,
        notification_service: Arc<dyn NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            device_authenticator,
            school_repo,
            student_repo,
            class_repo,
            schedule_repo,
            attendance_repo,
            parent_link_repo,
            notification_service,
            clock,
            checkout_min_gap_minutes: DEFAULT_CHECKOUT_MIN_GAP_MINUTES,
        }
    }

    pub fn with_checkout_gap(mut self, minutes: i64) -> Self {
        self.checkout_min_gap_minutes = minutes;
        self
    }

    /// Converts a UTC instant into the tenant's local wall-clock
    /// (spec §4.5 "Time handling"). Falls back to UTC if the stored
    /// zone name fails to parse — administration validates the zone at
    /// write time, so this should never trigger in practice.
    fn to_tenant_local(&self, tenant_timezone: &str, instant: DateTime<Utc>) -> chrono::NaiveDateTime {
        match chrono_tz::Tz::from_str(tenant_timezone) {
            Ok(tz) => instant.with_timezone(&tz).naive_local(),
            Err(_) => instant.naive_utc(),
        }
    }

    async fn notify_for_status(
        &self,
        tenant_id: Uuid,
        student_id: Uuid,
        class_id: Uuid,
        student_name: &str,
        status: AttendanceStatus,
        attendance_id: Uuid,
    ) -> Result<(), AppError> {
        let notification_type = match status {
            AttendanceStatus::Late => NotificationType::AttendanceLate,
            AttendanceStatus::VeryLate => NotificationType::AttendanceVeryLate,
            AttendanceStatus::Absent => NotificationType::AttendanceAbsent,
            _ => return Ok(()),
        };

        let mut recipients = self.parent_link_repo.parents_for_student(tenant_id, student_id).await?;

        if let Some(class) = self.class_repo.find_by_id(class_id, tenant_id).await? {
            if let Some(teacher_id) = class.homeroom_teacher_id {
                recipients.push(teacher_id);
            }
        }

        if recipients.is_empty() {
            return Ok(());
        }

        let mut data = HashMap::new();
        data.insert("attendance_id".to_string(), serde_json::json!(attendance_id));
        data.insert("student_id".to_string(), serde_json::json!(student_id));

        let title = format!("{student_name} — {}", status.as_str());
        let body = format!("{student_name} was marked {} today.", status.as_str());

        self.notification_service
            .notify(&recipients, notification_type, &title, &body, data)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AttendanceIngressService for AttendanceIngressServiceImpl {
    async fn ingest_rfid(
        &self,
        device_code: &str,
        api_key: &str,
        rfid_code: &str,
        device_timestamp: DateTime<Utc>,
    ) -> Result<Attendance, AppError> {
        let device_ctx = self.device_authenticator.authenticate_device(device_code, api_key).await?;
        let tenant_id = device_ctx.tenant_id;

        let school = self
            .school_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(AppError::SchoolInactive)?;
        if !school.active {
            return Err(AppError::SchoolInactive);
        }

        let student = self
            .student_repo
            .find_by_rfid(tenant_id, rfid_code)
            .await?
            .ok_or(AppError::NotFound("student"))?;
        if !student.active {
            return Err(AppError::NotFound("student"));
        }

        let local = self.to_tenant_local(&school.timezone, device_timestamp);
        let date = local.date();
        let local_time = local.time();

        let schedules = self.schedule_repo.list_active(tenant_id).await?;
        let schedule = resolve_active_schedule(&schedules, local)
            .cloned()
            .ok_or(AppError::OutOfScheduleWindow)?;

        let status = classify(local_time, &schedule).ok_or(AppError::OutOfScheduleWindow)?;

        let existing = self
            .attendance_repo
            .find_by_student_date(tenant_id, student.id, date)
            .await?;

        match existing {
            None => {
                let attendance = Attendance {
                    id: Uuid::new_v4(),
                    school_id: tenant_id,
                    student_id: student.id,
                    schedule_id: Some(schedule.id),
                    date,
                    check_in_time: Some(device_timestamp),
                    check_out_time: None,
                    status,
                    method: AttendanceMethod::Rfid,
                    created_at: self.clock.now(),
                    updated_at: self.clock.now(),
                };

                let created = self.attendance_repo.create(&attendance).await?;

                self.notify_for_status(
                    tenant_id,
                    student.id,
                    student.class_id,
                    &student.name,
                    status,
                    created.id,
                )
                .await?;

                Ok(created)
            }
            Some(mut row) => {
                let gap_ok = row
                    .check_in_time
                    .map(|check_in| (device_timestamp - check_in).num_minutes() > self.checkout_min_gap_minutes)
                    .unwrap_or(false);

                if row.check_out_time.is_none() && gap_ok && local_time <= schedule.end_time {
                    row.check_out_time = Some(device_timestamp);
                    row.updated_at = self.clock.now();
                    self.attendance_repo.update(&row).await
                } else {
                    Ok(row)
                }
            }
        }
    }

    async fn ingest_manual(
        &self,
        tenant_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
        status: &str,
        check_in_time: Option<DateTime<Utc>>,
        check_out_time: Option<DateTime<Utc>>,
    ) -> Result<Attendance, AppError> {
        let status = AttendanceStatus::parse(status)
            .ok_or_else(|| AppError::InvalidValue("attendance status".into()))?;

        let student = self
            .student_repo
            .find_by_id(student_id, tenant_id)
            .await?
            .ok_or(AppError::NotFound("student"))?;

        if matches!(status, AttendanceStatus::OnTime | AttendanceStatus::Late | AttendanceStatus::VeryLate)
            && check_in_time.is_none()
        {
            return Err(AppError::RequiredField("check_in_time".into()));
        }

        let school = self
            .school_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(AppError::SchoolInactive)?;

        let schedule_id = if let Some(check_in) = check_in_time {
            let local = self.to_tenant_local(&school.timezone, check_in);
            let schedules = self.schedule_repo.list_active(tenant_id).await?;
            resolve_active_schedule(&schedules, local).map(|s| s.id)
        } else {
            None
        };

        let existing = self
            .attendance_repo
            .find_by_student_date(tenant_id, student_id, date)
            .await?;

        let now = self.clock.now();
        let attendance = Attendance {
            id: existing.as_ref().map(|e| e.id).unwrap_or_else(Uuid::new_v4),
            school_id: tenant_id,
            student_id,
            schedule_id,
            date,
            check_in_time,
            check_out_time,
            status,
            method: AttendanceMethod::Manual,
            created_at: existing.as_ref().map(|e| e.created_at).unwrap_or(now),
            updated_at: now,
        };

        let saved = match existing {
            Some(_) => self.attendance_repo.update(&attendance).await?,
            None => self.attendance_repo.create(&attendance).await?,
        };

        self.notify_for_status(tenant_id, student_id, student.class_id, &student.name, status, saved.id)
            .await?;

        Ok(saved)
    }

    async fn sweep_absences(&self, tenant_id: Uuid, date: NaiveDate) -> Result<u64, AppError> {
        let student_ids = self.attendance_repo.students_without_attendance(tenant_id, date).await?;
        let now = self.clock.now();
        let mut written = 0u64;

        for student_id in student_ids {
            let student = match self.student_repo.find_by_id(student_id, tenant_id).await? {
                Some(s) if s.active => s,
                _ => continue,
            };

            let attendance = Attendance {
                id: Uuid::new_v4(),
                school_id: tenant_id,
                student_id,
                schedule_id: None,
                date,
                check_in_time: None,
                check_out_time: None,
                status: AttendanceStatus::Absent,
                method: AttendanceMethod::Manual,
                created_at: now,
                updated_at: now,
            };

            let created = self.attendance_repo.create(&attendance).await?;
            self.notify_for_status(
                tenant_id,
                student_id,
                student.class_id,
                &student.name,
                AttendanceStatus::Absent,
                created.id,
            )
            .await?;
            written += 1;
        }

        Ok(written)
    }
}
