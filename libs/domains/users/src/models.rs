use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User roles
///
/// `Admin` bypasses ownership checks everywhere; `Premium` users may own
/// catalog products they created.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Premium,
    Admin,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier; the only value a session may persist
    pub id: Uuid,
    /// User email (unique, case-sensitive key)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    /// Argon2 PHC string (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// Cart provisioned at registration; absent for the reserved admin
    pub cart: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a standard account (password already hashed by the service).
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        age: Option<i32>,
        password_hash: String,
        cart: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            first_name,
            last_name,
            age,
            password_hash,
            role: Role::User,
            cart: Some(cart),
            created_at: now,
            updated_at: now,
        }
    }

    /// Synthesize the reserved administrative identity.
    ///
    /// This record is never persisted; it exists only inside the auth
    /// service and is handed out on successful admin login.
    pub fn reserved_admin(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            first_name: "Store".to_string(),
            last_name: "Administrator".to_string(),
            age: None,
            password_hash,
            role: Role::Admin,
            cart: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User response DTO (without password hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub role: Role,
    pub cart: Option<Uuid>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            age: user.age,
            role: user.role,
            cart: user.cart,
        }
    }
}

/// DTO for account registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// DTO for password reset
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Response after a successful login: the identity plus its serialized
/// session value. Session transport (cookies, headers) is the caller's
/// concern.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub session: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::Premium.to_string(), "premium");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn new_user_gets_standard_role_and_cart() {
        let cart = Uuid::now_v7();
        let user = User::new(
            "a@b.test".to_string(),
            "Ana".to_string(),
            "Bos".to_string(),
            Some(30),
            "hash".to_string(),
            cart,
        );
        assert_eq!(user.role, Role::User);
        assert_eq!(user.cart, Some(cart));
    }

    #[test]
    fn response_hides_password_hash() {
        let user = User::reserved_admin("root@store.test".to_string(), "hash".to_string());
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
