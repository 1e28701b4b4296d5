use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Persistence interface for user identities.
///
/// Implementations can use different storage backends; the auth layer and
/// the catalog's owner resolution only ever talk to this trait. Email
/// uniqueness is a store-level constraint: `create` must fail with
/// [`UserError::DuplicateEmail`] rather than write a second record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Replace the stored password hash for the given email
    async fn update_password(&self, email: &str, password_hash: String) -> UserResult<()>;
}

/// In-memory implementation of [`UserStore`] (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_password(&self, email: &str, password_hash: String) -> UserResult<()> {
        let mut users = self.users.write().await;

        let user = users
            .values_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| UserError::Store(format!("no user with email '{}'", email)))?;

        user.password_hash = password_hash;
        user.updated_at = chrono::Utc::now();

        tracing::info!(user_id = %user.id, "Updated password");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> User {
        User::new(
            email.to_string(),
            "Test".to_string(),
            "User".to_string(),
            Some(25),
            "hashed_password".to_string(),
            Uuid::now_v7(),
        )
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let store = InMemoryUserStore::new();

        let created = store.create(sample_user("test@example.com")).await.unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "test@example.com");

        let by_email = store.find_by_email("test@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.create(sample_user("test@example.com")).await.unwrap();

        let fetched = store.find_by_email("TEST@EXAMPLE.COM").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_the_store() {
        let store = InMemoryUserStore::new();

        store.create(sample_user("test@example.com")).await.unwrap();
        let result = store.create(sample_user("test@example.com")).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn update_password_replaces_the_hash() {
        let store = InMemoryUserStore::new();
        let created = store.create(sample_user("test@example.com")).await.unwrap();

        store
            .update_password("test@example.com", "new_hash".to_string())
            .await
            .unwrap();

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash, "new_hash");
    }

    #[tokio::test]
    async fn update_password_for_unknown_email_fails() {
        let store = InMemoryUserStore::new();
        let result = store
            .update_password("ghost@example.com", "hash".to_string())
            .await;
        assert!(matches!(result, Err(UserError::Store(_))));
    }
}
