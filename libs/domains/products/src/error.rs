use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::ErrorResponse;
use thiserror::Error;

use crate::repository::StoreError;

/// Machine-readable catalog error codes, fixed per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductErrorCode {
    InvalidPageNumber,
    InvalidProductData,
    DuplicateProductCode,
    UndefinedProduct,
    DatabaseError,
    ProductCreationError,
    ProductUpdateError,
    ProductDeletionError,
}

impl ProductErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPageNumber => "INVALID_PAGE_NUMBER",
            Self::InvalidProductData => "INVALID_PRODUCT_DATA",
            Self::DuplicateProductCode => "DUPLICATE_PRODUCT_CODE",
            Self::UndefinedProduct => "UNDEFINED_PRODUCT",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ProductCreationError => "PRODUCT_CREATION_ERROR",
            Self::ProductUpdateError => "PRODUCT_UPDATE_ERROR",
            Self::ProductDeletionError => "PRODUCT_DELETION_ERROR",
        }
    }
}

impl std::fmt::Display for ProductErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog error taxonomy.
///
/// Validation-tier variants are raised at the exact point a rule is
/// violated and carry a fixed status. Wrapping-tier variants
/// (`Database`, `Creation`) re-wrap collaborator failures, carrying the
/// underlying error's status (default 500) and its diagnostic cause.
/// Causes are logged, never serialized to clients.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("The requested page does not exist")]
    InvalidPage { cause: String },

    #[error("Product data is incomplete or invalid")]
    InvalidData { cause: String },

    #[error("Product code '{code}' is already in use")]
    DuplicateCode { code: String },

    #[error("The product does not exist")]
    Undefined { cause: String },

    #[error("Could not read products from the store")]
    Database { cause: String, status: StatusCode },

    #[error("The product could not be created")]
    Creation { cause: String, status: StatusCode },

    #[error("At least one field must be provided to update")]
    EmptyUpdate,

    #[error("The product could not be deleted")]
    DeletionForbidden { cause: String },
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Wrap an unexpected store failure on a read path.
    pub fn database(err: &StoreError) -> Self {
        Self::Database {
            cause: err.to_string(),
            status: err.status(),
        }
    }

    /// Wrap an unexpected failure on the creation path.
    pub fn creation(err: &StoreError) -> Self {
        Self::Creation {
            cause: err.to_string(),
            status: err.status(),
        }
    }

    pub fn code(&self) -> ProductErrorCode {
        match self {
            Self::InvalidPage { .. } => ProductErrorCode::InvalidPageNumber,
            Self::InvalidData { .. } => ProductErrorCode::InvalidProductData,
            Self::DuplicateCode { .. } => ProductErrorCode::DuplicateProductCode,
            Self::Undefined { .. } => ProductErrorCode::UndefinedProduct,
            Self::Database { .. } => ProductErrorCode::DatabaseError,
            Self::Creation { .. } => ProductErrorCode::ProductCreationError,
            Self::EmptyUpdate => ProductErrorCode::ProductUpdateError,
            Self::DeletionForbidden { .. } => ProductErrorCode::ProductDeletionError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPage { .. } | Self::InvalidData { .. } => StatusCode::BAD_REQUEST,
            Self::DuplicateCode { .. } => StatusCode::CONFLICT,
            Self::Undefined { .. } => StatusCode::NOT_FOUND,
            Self::Database { status, .. } | Self::Creation { status, .. } => *status,
            Self::EmptyUpdate => StatusCode::INTERNAL_SERVER_ERROR,
            // An authorization rejection, not a server fault.
            Self::DeletionForbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    fn cause(&self) -> Option<&str> {
        match self {
            Self::InvalidPage { cause }
            | Self::InvalidData { cause }
            | Self::Undefined { cause }
            | Self::Database { cause, .. }
            | Self::Creation { cause, .. }
            | Self::DeletionForbidden { cause } => Some(cause),
            Self::DuplicateCode { .. } | Self::EmptyUpdate => None,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = self.status();

        match &self {
            Self::Database { cause, .. } | Self::Creation { cause, .. } => {
                tracing::error!(code = code.as_str(), cause, "catalog store failure");
            }
            other => {
                tracing::info!(code = code.as_str(), cause = other.cause(), "{}", other);
            }
        }

        (
            status,
            Json(ErrorResponse::new(code.as_str(), self.to_string())),
        )
            .into_response()
    }
}
