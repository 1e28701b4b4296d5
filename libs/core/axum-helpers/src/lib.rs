//! # Axum Helpers
//!
//! Shared utilities for the workspace's Axum services.
//!
//! - **[`errors`]**: structured error responses with machine-readable codes
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)
//! - **[`server`]**: router assembly, health endpoint, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use server::{create_app, create_router, health_router, shutdown_signal, HealthResponse};
