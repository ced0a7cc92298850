//! Error handling for the bookstore HTTP layer

use std::backtrace::Backtrace;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Payload carried under the `error` key of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    pub code: String,
    pub details: Vec<serde_json::Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
///
/// Construct values through the associated functions so the failure is logged
/// where it happens.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error("request timeout: {message}")]
    Timeout { message: String, code: String },

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl AppError {
    /// Create a validation error from a list of field-level messages
    pub fn validation(messages: Vec<String>) -> Self {
        let message = messages.join("; ");
        log_construction(StatusCode::BAD_REQUEST, &message);
        Self::Validation {
            details: messages.into_iter().map(serde_json::Value::String).collect(),
            code: "validation_error".to_string(),
            message,
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        let message = message.into();
        log_construction(StatusCode::NOT_FOUND, &message);
        Self::NotFound {
            message,
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        log_construction(StatusCode::BAD_REQUEST, &message);
        Self::BadRequest {
            message,
            code: "bad_request".to_string(),
        }
    }

    /// Create a request timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        let message = message.into();
        log_construction(StatusCode::REQUEST_TIMEOUT, &message);
        Self::Timeout {
            message,
            code: "request_timeout".to_string(),
        }
    }

    /// Wrap an unexpected failure
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        let error = error.into();
        log_construction(StatusCode::INTERNAL_SERVER_ERROR, &format!("{error:#}"));
        Self::Internal(error)
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Backtraces are only worth capturing for server-side failures.
fn captures_backtrace(status: StatusCode) -> bool {
    status.is_server_error()
}

fn log_construction(status: StatusCode, message: &str) {
    if captures_backtrace(status) {
        let backtrace = Backtrace::capture();
        tracing::error!(status_code = status.as_u16(), %message, %backtrace, "request failed");
    } else {
        tracing::debug!(status_code = status.as_u16(), %message, "request rejected");
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let (code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            } => (code, message, details),
            AppError::NotFound { message, code }
            | AppError::BadRequest { message, code }
            | AppError::Timeout { message, code } => (code, message, Vec::new()),
            AppError::Internal(e) => ("internal_error".to_string(), format!("{e:#}"), Vec::new()),
        };

        tracing::debug!(
            error_id = %error_id,
            error_code = %code,
            status_code = %status.as_u16(),
            "rendering error response"
        );

        let body = ErrorBody {
            message: message.clone(),
            status: status.as_u16(),
            code,
            details,
            trace_id: error_id.to_string(),
            timestamp,
        };

        (status, Json(json!({ "error": body, "message": message }))).into_response()
    }
}
