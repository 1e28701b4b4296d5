use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use core_config::admin::AdminConfig;
use std::sync::Arc;
use uuid::Uuid;

use crate::carts::CartProvisioner;
use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, User};
use crate::repository::UserStore;

/// Decision of an authentication strategy.
///
/// Expected failures are `Rejected` outcomes; infrastructure faults travel
/// through the `Err` branch of `UserResult<AuthOutcome>`, so the three
/// possible results of a strategy (accepted / rejected / failed) are each
/// a distinct, non-overlapping shape.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Accepted(User),
    Rejected(RejectReason),
}

/// Why a strategy declined the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The email is already registered, or is the reserved admin address
    DuplicateRegistration,
    /// No account exists for the given email
    UnknownUser,
    /// The password did not match the stored credential
    BadCredentials,
    /// Email or password was empty
    MissingCredentials,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::DuplicateRegistration => "account already registered",
            Self::UnknownUser => "user not found",
            Self::BadCredentials => "bad credentials",
            Self::MissingCredentials => "missing credentials",
        };
        write!(f, "{}", reason)
    }
}

/// Authentication strategy manager.
///
/// Owns the identity lifecycle: registration, credential verification,
/// password reset and the session identity mapping. Every strategy is a
/// self-contained decision over `(credentials, store state)`; no state is
/// carried between calls beyond what the store persists.
pub struct AuthService<R: UserStore, C: CartProvisioner> {
    store: Arc<R>,
    carts: Arc<C>,
    /// Synthesized privileged identity; never written to the store.
    reserved_admin: User,
}

impl<R: UserStore, C: CartProvisioner> AuthService<R, C> {
    /// Build the service, hashing the reserved admin secret up front.
    ///
    /// The plaintext secret from configuration is dropped here; admin
    /// logins verify against the hash through the same path as everyone
    /// else.
    pub fn new(store: Arc<R>, carts: Arc<C>, admin: &AdminConfig) -> UserResult<Self> {
        let password_hash = hash_password(&admin.password)?;
        let reserved_admin = User::reserved_admin(admin.email.clone(), password_hash);

        Ok(Self {
            store,
            carts,
            reserved_admin,
        })
    }

    /// The reserved administrative address; registration refuses it
    /// unconditionally.
    pub fn reserved_email(&self) -> &str {
        &self.reserved_admin.email
    }

    /// Register a new account.
    ///
    /// Rejects when the email is taken or reserved; otherwise provisions a
    /// cart, hashes the password and persists the new user.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<AuthOutcome> {
        let existing = self.store.find_by_email(&input.email).await?;

        // The reserved address rejects even though no such account is
        // persisted.
        if existing.is_some() || input.email == self.reserved_admin.email {
            tracing::info!(email = %input.email, "Registration rejected: address unavailable");
            return Ok(AuthOutcome::Rejected(RejectReason::DuplicateRegistration));
        }

        let cart = self.carts.provision_cart().await?;
        let password_hash = hash_password(&input.password)?;

        let user = User::new(
            input.email,
            input.first_name,
            input.last_name,
            input.age,
            password_hash,
            cart,
        );

        let created = self.store.create(user).await?;
        tracing::info!(user_id = %created.id, email = %created.email, "Registered user");

        Ok(AuthOutcome::Accepted(created))
    }

    /// Verify credentials.
    ///
    /// The reserved admin address resolves to the synthesized admin
    /// identity; all other emails resolve through the store. Both paths
    /// verify the password against an argon2 hash.
    pub async fn login(&self, email: &str, password: &str) -> UserResult<AuthOutcome> {
        if email == self.reserved_admin.email {
            return if verify_password(password, &self.reserved_admin.password_hash)? {
                tracing::info!("Admin login accepted");
                Ok(AuthOutcome::Accepted(self.reserved_admin.clone()))
            } else {
                Ok(AuthOutcome::Rejected(RejectReason::BadCredentials))
            };
        }

        let Some(user) = self.store.find_by_email(email).await? else {
            tracing::info!(email, "Login rejected: unknown user");
            return Ok(AuthOutcome::Rejected(RejectReason::UnknownUser));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(email, "Login rejected: bad credentials");
            return Ok(AuthOutcome::Rejected(RejectReason::BadCredentials));
        }

        Ok(AuthOutcome::Accepted(user))
    }

    /// Replace the password of an existing account and return the updated
    /// identity.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> UserResult<AuthOutcome> {
        if email.is_empty() || new_password.is_empty() {
            return Ok(AuthOutcome::Rejected(RejectReason::MissingCredentials));
        }

        let Some(user) = self.store.find_by_email(email).await? else {
            tracing::info!(email, "Password reset rejected: unknown user");
            return Ok(AuthOutcome::Rejected(RejectReason::UnknownUser));
        };

        let password_hash = hash_password(new_password)?;
        self.store.update_password(&user.email, password_hash).await?;

        // Re-read so the returned identity reflects the stored record.
        let Some(updated) = self.store.find_by_email(email).await? else {
            return Ok(AuthOutcome::Rejected(RejectReason::UnknownUser));
        };

        tracing::info!(user_id = %updated.id, "Password reset");
        Ok(AuthOutcome::Accepted(updated))
    }

    /// Extract the value a session may persist for this identity.
    pub fn serialize_identity(&self, user: &User) -> Uuid {
        user.id
    }

    /// Resolve a persisted session value back to a full identity.
    ///
    /// `None` means the caller must treat the session as unauthenticated.
    pub async fn deserialize_identity(&self, id: Uuid) -> UserResult<Option<User>> {
        if id == self.reserved_admin.id {
            return Ok(Some(self.reserved_admin.clone()));
        }

        self.store.find_by_id(id).await
    }
}

/// Session identity resolution behind a trait object, so other domains
/// can resolve callers without knowing the auth service's generics.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a serialized identity; `None` means unauthenticated.
    async fn resolve_identity(&self, id: Uuid) -> UserResult<Option<User>>;
}

#[async_trait]
impl<R: UserStore, C: CartProvisioner> IdentityResolver for AuthService<R, C> {
    async fn resolve_identity(&self, id: Uuid) -> UserResult<Option<User>> {
        self.deserialize_identity(id).await
    }
}

impl<R: UserStore, C: CartProvisioner> Clone for AuthService<R, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            carts: Arc::clone(&self.carts),
            reserved_admin: self.reserved_admin.clone(),
        }
    }
}

// Password helpers: the only place hashing primitives are touched.

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carts::{InMemoryCartProvisioner, MockCartProvisioner};
    use crate::models::Role;
    use crate::repository::InMemoryUserStore;

    const ADMIN_EMAIL: &str = "root@store.test";
    const ADMIN_PASSWORD: &str = "RootSecret1!";

    fn service() -> AuthService<InMemoryUserStore, InMemoryCartProvisioner> {
        AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryCartProvisioner::new()),
            &AdminConfig::new(ADMIN_EMAIL, ADMIN_PASSWORD),
        )
        .unwrap()
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Bos".to_string(),
            age: Some(30),
            password: "hunter2!".to_string(),
        }
    }

    fn accepted(outcome: AuthOutcome) -> User {
        match outcome {
            AuthOutcome::Accepted(user) => user,
            AuthOutcome::Rejected(reason) => panic!("expected accepted, got rejected: {reason}"),
        }
    }

    #[tokio::test]
    async fn register_provisions_cart_and_hashes_password() {
        let service = service();

        let user = accepted(service.register(registration("ana@example.com")).await.unwrap());

        assert_eq!(user.role, Role::User);
        assert!(user.cart.is_some());
        assert_ne!(user.password_hash, "hunter2!");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_rejects_existing_email() {
        let service = service();
        service.register(registration("ana@example.com")).await.unwrap();

        let outcome = service.register(registration("ana@example.com")).await.unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::DuplicateRegistration)
        ));
    }

    #[tokio::test]
    async fn register_rejects_reserved_address_without_prior_account() {
        let service = service();

        let outcome = service.register(registration(ADMIN_EMAIL)).await.unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::DuplicateRegistration)
        ));
    }

    #[tokio::test]
    async fn register_fails_when_cart_provisioning_fails() {
        let mut carts = MockCartProvisioner::new();
        carts
            .expect_provision_cart()
            .returning(|| Err(UserError::Cart("cart service unreachable".to_string())));

        let service = AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(carts),
            &AdminConfig::new(ADMIN_EMAIL, ADMIN_PASSWORD),
        )
        .unwrap();

        let result = service.register(registration("ana@example.com")).await;
        assert!(matches!(result, Err(UserError::Cart(_))));
    }

    #[tokio::test]
    async fn login_accepts_valid_credentials() {
        let service = service();
        service.register(registration("ana@example.com")).await.unwrap();

        let user = accepted(service.login("ana@example.com", "hunter2!").await.unwrap());
        assert_eq!(user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let service = service();
        service.register(registration("ana@example.com")).await.unwrap();

        let outcome = service.login("ana@example.com", "wrong").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let service = service();

        let outcome = service.login("ghost@example.com", "whatever").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn login_accepts_reserved_admin_with_correct_secret() {
        let service = service();

        let admin = accepted(service.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap());

        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.email, ADMIN_EMAIL);
        assert!(admin.cart.is_none());
    }

    #[tokio::test]
    async fn login_rejects_reserved_admin_with_wrong_secret() {
        let service = service();

        let outcome = service.login(ADMIN_EMAIL, "not-the-secret").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn admin_secret_is_never_kept_in_plaintext() {
        let service = service();
        assert!(service.reserved_admin.password_hash.starts_with("$argon2"));
        assert_ne!(service.reserved_admin.password_hash, ADMIN_PASSWORD);
    }

    #[tokio::test]
    async fn reset_password_rejects_missing_credentials() {
        let service = service();

        let outcome = service.reset_password("", "newpass").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::MissingCredentials)
        ));

        let outcome = service.reset_password("ana@example.com", "").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn reset_password_rejects_unknown_user() {
        let service = service();

        let outcome = service
            .reset_password("ghost@example.com", "newpass")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(RejectReason::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn reset_password_replaces_the_credential() {
        let service = service();
        service.register(registration("ana@example.com")).await.unwrap();

        let updated = accepted(
            service
                .reset_password("ana@example.com", "NewSecret9?")
                .await
                .unwrap(),
        );
        assert_eq!(updated.email, "ana@example.com");

        // Old password no longer works, new one does.
        let outcome = service.login("ana@example.com", "hunter2!").await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Rejected(_)));

        accepted(service.login("ana@example.com", "NewSecret9?").await.unwrap());
    }

    #[tokio::test]
    async fn identity_round_trips_through_the_session_contract() {
        let service = service();
        let user = accepted(service.register(registration("ana@example.com")).await.unwrap());

        let id = service.serialize_identity(&user);
        let resolved = service.deserialize_identity(id).await.unwrap().unwrap();

        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.email, user.email);
    }

    #[tokio::test]
    async fn deserialize_resolves_the_reserved_admin() {
        let service = service();
        let admin = accepted(service.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap());

        let resolved = service
            .deserialize_identity(service.serialize_identity(&admin))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.role, Role::Admin);
    }

    #[tokio::test]
    async fn deserialize_unknown_id_is_unauthenticated() {
        let service = service();

        let resolved = service.deserialize_identity(Uuid::now_v7()).await.unwrap();
        assert!(resolved.is_none());
    }
}
