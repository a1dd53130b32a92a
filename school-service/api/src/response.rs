//! Success-side half of the response envelope (spec §6): every JSON
//! response is either `{success:true, data, message?}` or
//! `{success:false, error:{code, message}}`. `AppError` already owns the
//! failure half (`shared_error::AppError::into_response`); this is the
//! matching success half so handlers never build either shape by hand.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: StatusCode::OK, data, message: None }
    }

    pub fn created(data: T) -> Self {
        Self { status: StatusCode::CREATED, data, message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = json!({
            "success": true,
            "data": self.data,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// `204`-style acknowledgement with no payload.
pub struct ApiAck;

impl IntoResponse for ApiAck {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": null})),
        )
            .into_response()
    }
}
