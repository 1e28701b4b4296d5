//! Structured error responses shared by every API in the workspace.
//!
//! Domain crates define their own error enums; what they share is the wire
//! shape ([`ErrorResponse`]) and the transport-level codes emitted by the
//! extractors and the fallback handler ([`ErrorCode`]).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for all error responses across the workspace:
/// - `error`: machine-readable identifier (e.g., "DUPLICATE_PRODUCT_CODE")
/// - `message`: human-readable message, safe to show to clients
/// - `details`: optional structured details (e.g., validation field errors)
///
/// Diagnostic causes are logged server-side, never serialized here.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Transport-level error codes used by this crate's extractors and
/// fallback handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request body failed validation
    ValidationError,
    /// Invalid UUID format in a path parameter
    InvalidUuid,
    /// No route matched the request
    NotFound,
    /// Missing or unresolvable caller identity
    Unauthorized,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidUuid => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build a JSON error response from a transport code and message.
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    (
        code.status(),
        Json(ErrorResponse::new(code.as_str(), message)),
    )
        .into_response()
}

/// Fallback handler returning a JSON 404 for unmatched routes.
pub async fn not_found() -> Response {
    error_response(ErrorCode::NotFound, "The requested route does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    }

    #[test]
    fn code_status_mapping() {
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidUuid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn response_serialization_skips_empty_details() {
        let body = ErrorResponse::new("NOT_FOUND", "missing");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert!(json.get("details").is_none());
    }
}
