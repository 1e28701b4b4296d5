//! HTTP handlers for the authentication API.
//!
//! Strategy outcomes map onto HTTP statuses here: accepted identities are
//! returned as JSON, rejections become 4xx responses with a reason, and
//! infrastructure faults go through the [`UserError`] response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{ErrorResponse, UuidPath, ValidatedJson};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::carts::CartProvisioner;
use crate::error::UserError;
use crate::models::{
    LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, UserResponse,
};
use crate::repository::UserStore;
use crate::service::{AuthOutcome, AuthService, RejectReason};

/// OpenAPI documentation for the authentication API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, reset_password, session),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        ResetPasswordRequest,
        UserResponse,
        LoginResponse,
        crate::models::Role,
    )),
    tags(
        (name = "Auth", description = "Registration, login and session identity")
    )
)]
pub struct ApiDoc;

/// Create the auth router with all HTTP endpoints
pub fn router<R, C>(service: AuthService<R, C>) -> Router
where
    R: UserStore + 'static,
    C: CartProvisioner + 'static,
{
    Router::new()
        .route("/register", post(register::<R, C>))
        .route("/login", post(login::<R, C>))
        .route("/reset-password", post(reset_password::<R, C>))
        .route("/session/{id}", get(session::<R, C>))
        .with_state(service)
}

fn rejected(status: StatusCode, reason: RejectReason) -> Response {
    (
        status,
        Json(ErrorResponse::new("AUTH_REJECTED", reason.to_string())),
    )
        .into_response()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 400, description = "Request validation failed"),
        (status = 409, description = "Email already registered or reserved"),
        (status = 500, description = "Store or cart provisioning failure")
    )
)]
async fn register<R: UserStore, C: CartProvisioner>(
    axum::extract::State(service): axum::extract::State<AuthService<R, C>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<Response, UserError> {
    match service.register(input).await? {
        AuthOutcome::Accepted(user) => {
            let session = service.serialize_identity(&user);
            let body = LoginResponse {
                user: UserResponse::from(user),
                session,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        AuthOutcome::Rejected(reason) => Ok(rejected(StatusCode::CONFLICT, reason)),
    }
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Unknown user or bad credentials"),
        (status = 500, description = "Store failure")
    )
)]
async fn login<R: UserStore, C: CartProvisioner>(
    axum::extract::State(service): axum::extract::State<AuthService<R, C>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Response, UserError> {
    match service.login(&input.email, &input.password).await? {
        AuthOutcome::Accepted(user) => {
            let session = service.serialize_identity(&user);
            let body = LoginResponse {
                user: UserResponse::from(user),
                session,
            };
            Ok(Json(body).into_response())
        }
        AuthOutcome::Rejected(reason) => Ok(rejected(StatusCode::UNAUTHORIZED, reason)),
    }
}

/// Reset the password of an existing account
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = UserResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Unknown user"),
        (status = 500, description = "Store failure")
    )
)]
async fn reset_password<R: UserStore, C: CartProvisioner>(
    axum::extract::State(service): axum::extract::State<AuthService<R, C>>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> Result<Response, UserError> {
    match service.reset_password(&input.email, &input.password).await? {
        AuthOutcome::Accepted(user) => Ok(Json(UserResponse::from(user)).into_response()),
        AuthOutcome::Rejected(reason @ RejectReason::MissingCredentials) => {
            Ok(rejected(StatusCode::BAD_REQUEST, reason))
        }
        AuthOutcome::Rejected(reason) => Ok(rejected(StatusCode::UNAUTHORIZED, reason)),
    }
}

/// Resolve a serialized session identity back to a user
#[utoipa::path(
    get,
    path = "/session/{id}",
    tag = "Auth",
    params(
        ("id" = Uuid, Path, description = "Serialized identity")
    ),
    responses(
        (status = 200, description = "Identity resolved", body = UserResponse),
        (status = 400, description = "Malformed identity"),
        (status = 401, description = "Unknown identity; treat as unauthenticated"),
        (status = 500, description = "Store failure")
    )
)]
async fn session<R: UserStore, C: CartProvisioner>(
    axum::extract::State(service): axum::extract::State<AuthService<R, C>>,
    UuidPath(id): UuidPath,
) -> Result<Response, UserError> {
    match service.deserialize_identity(id).await? {
        Some(user) => Ok(Json(UserResponse::from(user)).into_response()),
        None => Ok(axum_helpers::errors::error_response(
            axum_helpers::ErrorCode::Unauthorized,
            "No identity for this session",
        )),
    }
}
