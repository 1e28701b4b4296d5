//! Users Domain
//!
//! Identity lifecycle for the storefront: account registration, credential
//! verification, password reset and the session identity contract.
//!
//! The layering follows the workspace convention:
//! handlers (HTTP) → [`service::AuthService`] (strategy decisions) →
//! [`repository::UserStore`] / [`carts::CartProvisioner`] (collaborators) →
//! [`models`] (entities, DTOs).
//!
//! Authentication decisions are reported as
//! `Result<AuthOutcome, UserError>`: expected failures (unknown user, bad
//! credentials, duplicate registration) are `AuthOutcome::Rejected`
//! outcomes, while infrastructure faults surface through the error type.

pub mod carts;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use carts::{CartProvisioner, InMemoryCartProvisioner};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{LoginRequest, RegisterRequest, ResetPasswordRequest, Role, User, UserResponse};
pub use repository::{InMemoryUserStore, UserStore};
pub use service::{AuthOutcome, AuthService, IdentityResolver, RejectReason};
