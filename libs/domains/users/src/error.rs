use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::ErrorResponse;
use thiserror::Error;
use uuid::Uuid;

/// Infrastructure-tier failures of the identity layer.
///
/// Expected authentication failures (wrong password, unknown user,
/// duplicate registration) are not errors; they are rejection outcomes,
/// see [`crate::service::AuthOutcome`].
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Cart provisioning error: {0}")]
    Cart(String),

    #[error("User store error: {0}")]
    Store(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "USER_NOT_FOUND",
            Self::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            Self::Cart(_) => "CART_PROVISIONING_ERROR",
            Self::Store(_) => "USER_STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateEmail(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PasswordHash(_) | Self::Cart(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal faults keep their diagnostic detail in the logs only.
        let message = match &self {
            Self::PasswordHash(cause) | Self::Cart(cause) | Self::Store(cause) => {
                tracing::error!(code = self.code(), cause, "identity layer failure");
                "An internal error occurred".to_string()
            }
            other => {
                tracing::info!(code = other.code(), "{}", other);
                other.to_string()
            }
        };

        (status, Json(ErrorResponse::new(self.code(), message))).into_response()
    }
}
