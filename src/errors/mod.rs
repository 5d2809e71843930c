//! Unified error handling for the scanner adapter API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::models::media_type::SCANNER_ADAPTER_ERROR;
use crate::render::VendorJson;
use crate::upstream::UpstreamError;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Error envelope of the scanner adapter API.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ApiError {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Could not decode request body: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid scan request id: {0}")]
    MalformedToken(String),

    #[error("Scan request is {age_secs}s old, older than an hour, do not retry anymore")]
    Expired { age_secs: i64 },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::MalformedToken(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Expired { .. } | Self::Upstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MalformedToken(_) => "MALFORMED_SCAN_REQUEST_ID",
            Self::Expired { .. } => "SCAN_REQUEST_EXPIRED",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::warn!(error = %self, code = self.code(), "Request rejected");
        }

        VendorJson(
            status,
            SCANNER_ADAPTER_ERROR,
            ErrorResponse::new(self.code(), &self.to_string()),
        )
        .into_response()
    }
}
