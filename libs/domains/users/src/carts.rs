use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;

/// Cart-creation collaborator.
///
/// Registration provisions exactly one cart per new account. The cart
/// service itself lives outside this domain; a failure here surfaces as
/// [`crate::error::UserError::Cart`] and aborts the registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartProvisioner: Send + Sync {
    /// Create an empty cart and return its reference
    async fn provision_cart(&self) -> UserResult<Uuid>;
}

/// In-memory implementation of [`CartProvisioner`] (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCartProvisioner;

impl InMemoryCartProvisioner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CartProvisioner for InMemoryCartProvisioner {
    async fn provision_cart(&self) -> UserResult<Uuid> {
        let cart = Uuid::now_v7();
        tracing::info!(cart_id = %cart, "Provisioned cart");
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provisioned_carts_are_distinct() {
        let carts = InMemoryCartProvisioner::new();
        let first = carts.provision_cart().await.unwrap();
        let second = carts.provision_cart().await.unwrap();
        assert_ne!(first, second);
    }
}
