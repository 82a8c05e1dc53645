//! HTTP response DTOs and error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::GatewayError;

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub detail: String,
}

impl ErrorResponse {
    /// Create an error body.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// `GatewayError` rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and body for this error.
    #[must_use]
    pub fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match &self.0 {
            GatewayError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("Price not found"))
            }
            GatewayError::UpstreamUnavailable { upstream, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(format!("Failed to fetch price from {upstream}")),
            ),
            GatewayError::Cache(_) | GatewayError::AuditLog(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Price request failed");
        }
        (status, Json(body)).into_response()
    }
}
