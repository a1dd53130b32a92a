//! Pure functions for active-schedule resolution, overlap checking, and
//! check-in classification (C5). Nothing here touches the database or
//! the clock directly — callers resolve "now" via `shared_context::Clock`
//! and pass in the already-loaded schedule set, so these functions stay
//! trivially unit-testable.

use super::model::{AttendanceSchedule, AttendanceStatus};
use chrono::{Datelike, NaiveDateTime, NaiveTime};

/// Resolve the schedule active at `instant` out of `schedules` (spec
/// §4.5). Only `active = true` entries are considered. Ties (more than
/// one schedule matching) are a data-integrity issue the overlap check
/// should have prevented; we fall back to the lexicographically lowest
/// id for determinism and expect the caller to log.
pub fn resolve_active_schedule(
    schedules: &[AttendanceSchedule],
    instant: NaiveDateTime,
) -> Option<&AttendanceSchedule> {
    let weekday = instant.weekday();
    let time = instant.time();

    let mut matches: Vec<&AttendanceSchedule> = schedules
        .iter()
        .filter(|s| s.active && s.covers_weekday(weekday) && s.contains_time(time))
        .collect();

    if matches.len() == 1 {
        return matches.pop();
    }

    if matches.is_empty() {
        return schedules
            .iter()
            .find(|s| s.is_default && s.active && s.covers_weekday(weekday));
    }

    matches.sort_by_key(|s| s.id);
    tracing::warn!(
        weekday = ?weekday,
        count = matches.len(),
        "multiple active schedules matched the same instant; data-integrity violation"
    );
    matches.into_iter().next()
}

/// True if `candidate` overlaps any schedule in `existing` on a shared
/// weekday (spec §4.5). `existing` should already exclude `candidate`
/// itself when checking an update.
pub fn check_overlap(candidate: &AttendanceSchedule, existing: &[AttendanceSchedule]) -> bool {
    existing.iter().any(|other| {
        other.id != candidate.id
            && other.active
            && candidate.days_of_week.intersects(&other.days_of_week)
            && candidate.start_time < other.end_time
            && candidate.end_time > other.start_time
    })
}

/// Classify a check-in at local time `l` against the already-resolved
/// schedule `s`. Returns `None` when `l` is past `s.end_time` — the
/// caller must treat that as `OUT_OF_SCHEDULE_WINDOW` and reject the
/// event rather than persist a status (spec §4.5, §9 Open Question).
pub fn classify(l: NaiveTime, s: &AttendanceSchedule) -> Option<AttendanceStatus> {
    if l > s.end_time {
        return None;
    }

    if l < s.start_time {
        return Some(AttendanceStatus::OnTime);
    }

    let minutes_after_start = (l - s.start_time).num_minutes() as i32;

    if minutes_after_start <= s.late_threshold_minutes {
        return Some(AttendanceStatus::OnTime);
    }

    if let Some(very_late_threshold) = s.very_late_threshold_minutes {
        if minutes_after_start <= very_late_threshold {
            return Some(AttendanceStatus::Late);
        }
        return Some(AttendanceStatus::VeryLate);
    }

    Some(AttendanceStatus::Late)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::schedule::model::DaysOfWeek;
    use chrono::{NaiveDate, Utc, Weekday};
    use uuid::Uuid;

    fn schedule(
        start: &str,
        end: &str,
        late: i32,
        very_late: Option<i32>,
        days: &[Weekday],
    ) -> AttendanceSchedule {
        AttendanceSchedule {
            id: Uuid::new_v4(),
            school_id: Uuid::new_v4(),
            name: "morning".into(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            late_threshold_minutes: late,
            very_late_threshold_minutes: very_late,
            days_of_week: DaysOfWeek::from_days(days),
            active: true,
            is_default: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn weekdays_mon_fri() -> Vec<Weekday> {
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
    }

    fn at(hm: &str) -> NaiveTime {
        NaiveTime::parse_from_str(hm, "%H:%M").unwrap()
    }

    #[test]
    fn s1_classify_on_time() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        assert_eq!(classify(at("07:10"), &s), Some(AttendanceStatus::OnTime));
    }

    #[test]
    fn s2_classify_late() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        assert_eq!(classify(at("07:20"), &s), Some(AttendanceStatus::Late));
    }

    #[test]
    fn s3_classify_very_late() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        assert_eq!(classify(at("07:45"), &s), Some(AttendanceStatus::VeryLate));
    }

    #[test]
    fn s4_reject_out_of_window() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        assert_eq!(classify(at("08:30"), &s), None);
    }

    #[test]
    fn early_arrival_before_start_is_on_time() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        assert_eq!(classify(at("06:45"), &s), Some(AttendanceStatus::OnTime));
    }

    #[test]
    fn classify_without_very_late_threshold_caps_at_late() {
        let s = schedule("07:00", "08:00", 15, None, &weekdays_mon_fri());
        assert_eq!(classify(at("07:59"), &s), Some(AttendanceStatus::Late));
    }

    #[test]
    fn s5_overlap_rejection() {
        let s1 = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        let candidate = schedule("07:30", "08:30", 15, Some(30), &[Weekday::Mon]);
        assert!(check_overlap(&candidate, &[s1]));
    }

    #[test]
    fn non_overlapping_schedules_pass() {
        let s1 = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        let candidate = schedule("08:00", "09:00", 15, Some(30), &weekdays_mon_fri());
        // Touching at the boundary is not an overlap: start < end, end > start
        // both require strict inequality.
        assert!(!check_overlap(&candidate, &[s1]));
    }

    #[test]
    fn disjoint_weekdays_never_overlap() {
        let s1 = schedule("07:00", "08:00", 15, Some(30), &[Weekday::Mon]);
        let candidate = schedule("07:00", "08:00", 15, Some(30), &[Weekday::Tue]);
        assert!(!check_overlap(&candidate, &[s1]));
    }

    #[test]
    fn resolve_picks_the_unique_match() {
        let s = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(7, 10, 0)
            .unwrap();
        let resolved = resolve_active_schedule(std::slice::from_ref(&s), monday);
        assert_eq!(resolved.unwrap().id, s.id);
    }

    #[test]
    fn resolve_falls_back_to_default_when_no_window_matches() {
        let mut default_schedule = schedule("07:00", "08:00", 15, Some(30), &weekdays_mon_fri());
        default_schedule.is_default = true;
        let noon = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let resolved = resolve_active_schedule(std::slice::from_ref(&default_schedule), noon);
        assert_eq!(resolved.unwrap().id, default_schedule.id);
    }

    #[test]
    fn resolve_returns_none_when_weekday_uncovered() {
        let s = schedule("07:00", "08:00", 15, Some(30), &[Weekday::Mon]);
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6)
            .unwrap()
            .and_hms_opt(7, 10, 0)
            .unwrap();
        assert!(resolve_active_schedule(std::slice::from_ref(&s), saturday).is_none());
    }

    proptest::proptest! {
        #[test]
        fn classify_is_monotone(start_min in 0i64..23*60, late in 1i32..60, extra in 0i32..60) {
            use chrono::Duration;
            let start = NaiveTime::from_num_seconds_from_midnight_opt((start_min * 60) as u32, 0).unwrap();
            let end = start + Duration::minutes(120);
            let very_late = late + extra;
            let s = AttendanceSchedule {
                id: Uuid::new_v4(),
                school_id: Uuid::new_v4(),
                name: "prop".into(),
                start_time: start,
                end_time: end,
                late_threshold_minutes: late,
                very_late_threshold_minutes: Some(very_late),
                days_of_week: DaysOfWeek::from_days(&[Weekday::Mon]),
                active: true,
                is_default: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };

            let l1 = start + Duration::minutes(1);
            let l2 = start + Duration::minutes(1).max(Duration::minutes((late + extra / 2).max(1) as i64));
            if l1 <= end && l2 <= end && l1 <= l2 {
                if let (Some(c1), Some(c2)) = (classify(l1, &s), classify(l2, &s)) {
                    prop_assert!(c1 <= c2);
                }
            }
        }
    }
}
