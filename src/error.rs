use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// One failed check on a submitted form
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the HTTP handlers.
///
/// Upstream details are logged but never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0:?}")]
    InvalidRequest(Vec<FieldIssue>),

    #[error("inference request failed: {0}")]
    Upstream(String),

    #[error("analytics forwarding failed: {0}")]
    Analytics(String),

    #[error("metrics encoding failed: {0}")]
    Metrics(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldIssue]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::InvalidRequest(issues) => {
                (StatusCode::BAD_REQUEST, "Invalid request", Some(issues.as_slice()))
            }
            AppError::Upstream(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate prompt", None)
            }
            AppError::Analytics(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to track event", None)
            }
            AppError::Metrics(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics", None)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
