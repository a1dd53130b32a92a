//! Clock & request-context primitives (C1).
//!
//! `RequestContext` is the *only* place a handler or service may read a
//! tenant id from. Nothing downstream should accept a `tenant_id` as a
//! plain function argument sourced from request bodies or path params —
//! it always flows through this struct, built once by the authorization
//! middleware after token verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// The six roles in the fixed authorization matrix (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PlatformAdmin,
    SchoolAdmin,
    Counselor,
    HomeroomTeacher,
    Parent,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "platform_admin",
            Role::SchoolAdmin => "school_admin",
            Role::Counselor => "counselor",
            Role::HomeroomTeacher => "homeroom_teacher",
            Role::Parent => "parent",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "platform_admin" => Some(Role::PlatformAdmin),
            "school_admin" => Some(Role::SchoolAdmin),
            "counselor" => Some(Role::Counselor),
            "homeroom_teacher" => Some(Role::HomeroomTeacher),
            "parent" => Some(Role::Parent),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monotonic wall clock, injected everywhere a component needs "now" so
/// tests can control time. `SystemClock` is the only production impl;
/// nothing else should call `Utc::now()` directly inside C5/C6/C9 logic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test double that always returns a fixed instant unless advanced.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: std::sync::Arc::new(std::sync::Mutex::new(instant)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.instant.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().expect("clock mutex poisoned")
    }
}

/// The binding between a request and its requester, constructed once by
/// the authorization middleware (C4) from verified JWT claims.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: Role,
    /// `None` only for `platform_admin` on platform-admin routes.
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub locale: String,
    pub request_id: Uuid,
    pub deadline: DateTime<Utc>,
}

impl RequestContext {
    /// The tenant id, required for every tenant-scoped operation.
    ///
    /// Returns `None` when called by platform_admin; callers on
    /// tenant-scoped routes must turn that into
    /// `AppError::TenantRequired` rather than silently proceeding.
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.deadline - now).to_std().unwrap_or(Duration::ZERO)
    }
}
