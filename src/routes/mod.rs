pub mod auth;
pub mod riders;
pub mod sheets;
pub mod wallet;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::notify::NotificationSender;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Configured platform treasury actor; sheet settlements credit this
    /// wallet's earnings.
    pub treasury_user_id: i64,
    pub notifier: Arc<dyn NotificationSender>,
}

/// Error response body: machine-checkable code plus human-readable message.
#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// API error carrying the HTTP status and wire code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Opaque 500. Internal details go to the log, not the caller.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "Internal server error",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
