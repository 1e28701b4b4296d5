//! UUID path parameter extractor with automatic validation.

use crate::errors::{error_response, ErrorCode};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for UUID path parameters.
///
/// Parses the single path parameter as a UUID and returns a structured
/// 400 response when it is malformed.
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match Uuid::parse_str(&raw) {
            Ok(id) => Ok(UuidPath(id)),
            Err(_) => Err(error_response(
                ErrorCode::InvalidUuid,
                format!("Invalid UUID: {}", raw),
            )),
        }
    }
}
