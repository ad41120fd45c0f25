use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to resolve local host name: {0}")]
    HostName(#[source] io::Error),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Cause stays in the log (request span); the body is generic
        tracing::error!(error = %self, "Internal error");

        let body = ErrorResponse {
            error: "internal_error",
            message: "An internal error occurred",
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
