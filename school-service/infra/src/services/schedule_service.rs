//! Schedule administration service (C5 persistence half). The pure
//! decision functions live in `school_service_core::domains::schedule::engine`;
//! this impl is the thin persistence+invariant wrapper the spec's §4.5
//! limits (ten schedules per tenant, at most one default, no overlap)
//! need to span more than one row at a time.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use school_service_core::domains::schedule::engine::{check_overlap, resolve_active_schedule};
use school_service_core::domains::schedule::AttendanceSchedule;
use school_service_core::repositories::ScheduleRepository;
use school_service_core::services::ScheduleService;
use shared_error::AppError;
use std::sync::Arc;
use uuid::Uuid;

const MAX_SCHEDULES_PER_TENANT: i64 = 10;

pub struct ScheduleServiceImpl {
    schedule_repo: Arc<dyn ScheduleRepository>,
}

impl ScheduleServiceImpl {
    pub fn new(schedule_repo: Arc<dyn ScheduleRepository>) -> Self {
        Self { schedule_repo }
    }

    async fn assert_no_overlap(&self, tenant_id: Uuid, candidate: &AttendanceSchedule) -> Result<(), AppError> {
        if !candidate.is_well_formed() {
            return Err(AppError::InvalidValue("schedule time window or thresholds".into()));
        }
        let existing = self.schedule_repo.list_active(tenant_id).await?;
        if check_overlap(candidate, &existing) {
            return Err(AppError::ScheduleTimeOverlap);
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleService for ScheduleServiceImpl {
    async fn create(&self, tenant_id: Uuid, mut schedule: AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
        schedule.school_id = tenant_id;

        let count = self.schedule_repo.count(tenant_id).await?;
        if count >= MAX_SCHEDULES_PER_TENANT {
            return Err(AppError::ScheduleLimitExceeded);
        }

        self.assert_no_overlap(tenant_id, &schedule).await?;

        if schedule.is_default {
            self.schedule_repo.clear_default(tenant_id).await?;
        }

        self.schedule_repo.create(&schedule).await
    }

    async fn update(&self, tenant_id: Uuid, schedule: AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
        let existing = self
            .schedule_repo
            .find_by_id(schedule.id, tenant_id)
            .await?
            .ok_or(AppError::NotFound("schedule"))?;
        let _ = existing;

        self.assert_no_overlap(tenant_id, &schedule).await?;

        if schedule.is_default {
            self.schedule_repo.clear_default(tenant_id).await?;
        }

        self.schedule_repo.update(&schedule).await
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.schedule_repo.is_in_use(id, tenant_id).await? {
            return Err(AppError::ScheduleInUse);
        }
        self.schedule_repo.delete(id, tenant_id).await
    }

    async fn set_default(&self, tenant_id: Uuid, id: Uuid) -> Result<AttendanceSchedule, AppError> {
        let mut schedule = self
            .schedule_repo
            .find_by_id(id, tenant_id)
            .await?
            .ok_or(AppError::NotFound("schedule"))?;

        self.schedule_repo.clear_default(tenant_id).await?;
        schedule.is_default = true;
        self.schedule_repo.update(&schedule).await
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError> {
        self.schedule_repo.list_all(tenant_id).await
    }

    async fn active_at(&self, tenant_id: Uuid, instant_local: NaiveDateTime) -> Result<Option<AttendanceSchedule>, AppError> {
        let schedules = self.schedule_repo.list_active(tenant_id).await?;
        Ok(resolve_active_schedule(&schedules, instant_local).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveTime, Utc, Weekday};
    use school_service_core::domains::schedule::model::DaysOfWeek;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeScheduleRepo {
        rows: Mutex<Vec<AttendanceSchedule>>,
    }

    #[async_trait]
    impl ScheduleRepository for FakeScheduleRepo {
        async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<AttendanceSchedule>, AppError> {
            Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id && s.school_id == tenant_id).cloned())
        }
        async fn list_active(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError> {
            Ok(self.rows.lock().unwrap().iter().filter(|s| s.school_id == tenant_id && s.active).cloned().collect())
        }
        async fn list_all(&self, tenant_id: Uuid) -> Result<Vec<AttendanceSchedule>, AppError> {
            Ok(self.rows.lock().unwrap().iter().filter(|s| s.school_id == tenant_id).cloned().collect())
        }
        async fn count(&self, tenant_id: Uuid) -> Result<i64, AppError> {
            Ok(self.rows.lock().unwrap().iter().filter(|s| s.school_id == tenant_id).count() as i64)
        }
        async fn create(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
            self.rows.lock().unwrap().push(schedule.clone());
            Ok(schedule.clone())
        }
        async fn update(&self, schedule: &AttendanceSchedule) -> Result<AttendanceSchedule, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(existing) = rows.iter_mut().find(|s| s.id == schedule.id) {
                *existing = schedule.clone();
            }
            Ok(schedule.clone())
        }
        async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
            self.rows.lock().unwrap().retain(|s| !(s.id == id && s.school_id == tenant_id));
            Ok(())
        }
        async fn clear_default(&self, tenant_id: Uuid) -> Result<(), AppError> {
            for s in self.rows.lock().unwrap().iter_mut().filter(|s| s.school_id == tenant_id) {
                s.is_default = false;
            }
            Ok(())
        }
        async fn is_in_use(&self, _id: Uuid, _tenant_id: Uuid) -> Result<bool, AppError> {
            Ok(false)
        }
    }

    fn schedule(tenant_id: Uuid, start: &str, end: &str, is_default: bool) -> AttendanceSchedule {
        AttendanceSchedule {
            id: Uuid::new_v4(),
            school_id: tenant_id,
            name: "morning".into(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            late_threshold_minutes: 15,
            very_late_threshold_minutes: Some(30),
            days_of_week: DaysOfWeek::from_days(&[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]),
            active: true,
            is_default,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn rejects_overlapping_schedule() {
        let repo = Arc::new(FakeScheduleRepo::default());
        let tenant_id = Uuid::new_v4();
        let service = ScheduleServiceImpl::new(repo.clone());

        service.create(tenant_id, schedule(tenant_id, "07:00", "08:00", false)).await.unwrap();
        let err = service.create(tenant_id, schedule(tenant_id, "07:30", "08:30", false)).await.unwrap_err();
        assert!(matches!(err, AppError::ScheduleTimeOverlap));
    }

    #[tokio::test]
    async fn setting_a_new_default_clears_the_old_one() {
        let repo = Arc::new(FakeScheduleRepo::default());
        let tenant_id = Uuid::new_v4();
        let service = ScheduleServiceImpl::new(repo.clone());

        let first = service.create(tenant_id, schedule(tenant_id, "07:00", "08:00", true)).await.unwrap();
        let second = service.create(tenant_id, schedule(tenant_id, "13:00", "14:00", false)).await.unwrap();

        service.set_default(tenant_id, second.id).await.unwrap();

        let refreshed_first = service.schedule_repo.find_by_id(first.id, tenant_id).await.unwrap().unwrap();
        assert!(!refreshed_first.is_default);
    }

    #[tokio::test]
    async fn rejects_an_eleventh_schedule() {
        let repo = Arc::new(FakeScheduleRepo::default());
        let tenant_id = Uuid::new_v4();
        let service = ScheduleServiceImpl::new(repo.clone());

        for i in 0..10 {
            let hour = 6 + i;
            service
                .create(
                    tenant_id,
                    schedule(tenant_id, &format!("{hour:02}:00"), &format!("{hour:02}:30"), false),
                )
                .await
                .unwrap();
        }

        let err = service.create(tenant_id, schedule(tenant_id, "20:00", "20:30", false)).await.unwrap_err();
        assert!(matches!(err, AppError::ScheduleLimitExceeded));
    }
}
