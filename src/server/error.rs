//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`; any [`trailerforged_common::Error`]
//! converts with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use trailerforged_common::Error;

/// Structured error body returned by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Wrapper so we can implement `IntoResponse` for the shared error type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
    details: Option<String>,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self {
            inner,
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal failures are logged in full but never echoed to clients.
        let message = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = self.request_id.as_deref().unwrap_or("-"),
                "Server error in API handler"
            );
            "an unexpected error occurred".to_string()
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
            self.inner.to_string()
        };

        let body = ErrorBody {
            error_code: self.inner.code(),
            message,
            details: self.details,
            request_id: self.request_id,
        };

        (status, axum::Json(body)).into_response()
    }
}
