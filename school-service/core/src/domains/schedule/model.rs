use chrono::{DateTime, NaiveTime, Utc, Weekday};
use sqlx::FromRow;
use uuid::Uuid;

/// Bitmask over Mon..Sun, bit 0 = Monday (matches `Weekday::num_days_from_monday`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct DaysOfWeek(pub i16);

impl DaysOfWeek {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, day: Weekday) -> Self {
        self.0 |= 1 << day.num_days_from_monday();
        self
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().fold(Self::empty(), |acc, d| acc.with(*d))
    }

    pub fn intersects(&self, other: &DaysOfWeek) -> bool {
        self.0 & other.0 != 0
    }
}

/// Status an attendance row settles into. Ordered on_time < late <
/// very_late so classification monotonicity (spec §8 invariant 5) can
/// be checked with a plain `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum AttendanceStatus {
    OnTime,
    Late,
    VeryLate,
    Absent,
    Sick,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "on_time",
            AttendanceStatus::Late => "late",
            AttendanceStatus::VeryLate => "very_late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Sick => "sick",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on_time" => Some(Self::OnTime),
            "late" => Some(Self::Late),
            "very_late" => Some(Self::VeryLate),
            "absent" => Some(Self::Absent),
            "sick" => Some(Self::Sick),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }

    /// Manual entry may only set these three in addition to the
    /// check-in-derived ones; `absent` is also settable manually.
    pub fn is_manual_only(&self) -> bool {
        matches!(self, Self::Sick | Self::Excused)
    }
}

/// A single named check-in window for a tenant (spec §3, §4.5). At
/// most ten per tenant, at most one with `is_default = true`, and no
/// two active schedules may share a weekday while overlapping in time.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceSchedule {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub late_threshold_minutes: i32,
    pub very_late_threshold_minutes: Option<i32>,
    pub days_of_week: DaysOfWeek,
    pub active: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceSchedule {
    pub fn is_well_formed(&self) -> bool {
        let duration_ok = self.end_time > self.start_time;
        let threshold_ok = match self.very_late_threshold_minutes {
            Some(very_late) => very_late >= self.late_threshold_minutes,
            None => true,
        };
        duration_ok && threshold_ok
    }

    pub fn covers_weekday(&self, day: Weekday) -> bool {
        self.days_of_week.contains(day)
    }

    pub fn contains_time(&self, time: NaiveTime) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}
