//! Closed set of error kinds for the school-management backend.
//!
//! `AppError` is the only error type that crosses a component boundary.
//! Each variant maps to exactly one of the stable error codes in the
//! spec's error taxonomy; `IntoResponse` is the single place that
//! translates an `AppError` into an HTTP response. Nothing downstream of
//! a handler should ever construct a `Response` by hand for an error
//! path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    // --- AUTH_* ---
    InvalidCredentials,
    AccountInactive,
    SchoolInactive,
    TokenExpired,
    InvalidToken,
    MustResetPassword,

    // --- AUTHZ_* ---
    TenantRequired,
    TenantMismatch,
    ClassMismatch,
    NotLinked,
    Forbidden(String),

    // --- VAL_* ---
    RequiredField(String),
    InvalidFormat(String),
    InvalidValue(String),
    Duplicate(String),

    // --- domain-specific conflicts ---
    ConflictAttendance(String),
    ScheduleTimeOverlap,
    ScheduleLimitExceeded,
    ScheduleInUse,
    OutOfScheduleWindow,

    // --- NOT_FOUND_* ---
    NotFound(&'static str),

    // --- transport / infra ---
    Timeout,
    Database(sqlx::Error),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidCredentials => write!(f, "invalid credentials"),
            AppError::AccountInactive => write!(f, "account is inactive"),
            AppError::SchoolInactive => write!(f, "school is inactive"),
            AppError::TokenExpired => write!(f, "token expired"),
            AppError::InvalidToken => write!(f, "invalid token"),
            AppError::MustResetPassword => write!(f, "password reset required"),
            AppError::TenantRequired => write!(f, "tenant context required"),
            AppError::TenantMismatch => write!(f, "tenant mismatch"),
            AppError::ClassMismatch => write!(f, "class mismatch"),
            AppError::NotLinked => write!(f, "not linked to this student"),
            AppError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            AppError::RequiredField(field) => write!(f, "missing required field: {field}"),
            AppError::InvalidFormat(field) => write!(f, "invalid format: {field}"),
            AppError::InvalidValue(field) => write!(f, "invalid value: {field}"),
            AppError::Duplicate(field) => write!(f, "duplicate: {field}"),
            AppError::ConflictAttendance(msg) => write!(f, "attendance conflict: {msg}"),
            AppError::ScheduleTimeOverlap => write!(f, "schedule overlaps an existing schedule"),
            AppError::ScheduleLimitExceeded => write!(f, "schedule limit exceeded"),
            AppError::ScheduleInUse => write!(f, "schedule is in use"),
            AppError::OutOfScheduleWindow => write!(f, "event is outside the schedule window"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Timeout => write!(f, "request timed out"),
            AppError::Database(e) => write!(f, "database error: {e}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Stable error code, per the spec's closed taxonomy (§7).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            AppError::AccountInactive => "AUTH_ACCOUNT_INACTIVE",
            AppError::SchoolInactive => "AUTH_SCHOOL_INACTIVE",
            AppError::TokenExpired => "AUTH_TOKEN_EXPIRED",
            AppError::InvalidToken => "AUTH_TOKEN_INVALID",
            AppError::MustResetPassword => "AUTH_MUST_RESET_PASSWORD",
            AppError::TenantRequired => "AUTHZ_TENANT_REQUIRED",
            AppError::TenantMismatch => "AUTHZ_TENANT_MISMATCH",
            AppError::ClassMismatch => "AUTHZ_CLASS_MISMATCH",
            AppError::NotLinked => "AUTHZ_NOT_LINKED",
            AppError::Forbidden(_) => "AUTHZ_FORBIDDEN",
            AppError::RequiredField(_) => "VAL_REQUIRED_FIELD",
            AppError::InvalidFormat(_) => "VAL_INVALID_FORMAT",
            AppError::InvalidValue(_) => "VAL_INVALID_VALUE",
            AppError::Duplicate(_) => "VAL_DUPLICATE",
            AppError::ConflictAttendance(_) => "CONFLICT_ATTENDANCE",
            AppError::ScheduleTimeOverlap => "SCHEDULE_TIME_OVERLAP",
            AppError::ScheduleLimitExceeded => "SCHEDULE_LIMIT_EXCEEDED",
            AppError::ScheduleInUse => "SCHEDULE_IN_USE",
            AppError::OutOfScheduleWindow => "OUT_OF_SCHEDULE_WINDOW",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Timeout => "TIMEOUT",
            AppError::Database(_) => "INTERNAL_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::AccountInactive
            | AppError::SchoolInactive
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::MustResetPassword => StatusCode::UNAUTHORIZED,

            AppError::TenantRequired
            | AppError::TenantMismatch
            | AppError::ClassMismatch
            | AppError::NotLinked
            | AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            AppError::RequiredField(_)
            | AppError::InvalidFormat(_)
            | AppError::InvalidValue(_)
            | AppError::OutOfScheduleWindow => StatusCode::BAD_REQUEST,

            AppError::Duplicate(_)
            | AppError::ConflictAttendance(_)
            | AppError::ScheduleTimeOverlap
            | AppError::ScheduleInUse => StatusCode::CONFLICT,

            AppError::ScheduleLimitExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message text shown to the client. Internal/database errors never
    /// leak their cause; everything else echoes `Display`.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "an internal error occurred".to_string(),
            AppError::Internal(_) => "an internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Database(_) | AppError::Internal(_)) {
            tracing::error!(error = %self, "internal error");
        }

        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource"),
            other => AppError::Database(other),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Internal(format!("missing configuration: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
