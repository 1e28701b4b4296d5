use async_trait::async_trait;
use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ListOptions, Paginated, PriceOrder, Product, ProductFilter, ProductPatch};

/// Failures surfaced by a product store.
///
/// Each variant carries an HTTP-equivalent status so the wrapping tier can
/// preserve it (`DATABASE_ERROR`/`PRODUCT_CREATION_ERROR` default to the
/// status reported here).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product code '{0}' already exists")]
    DuplicateCode(String),

    #[error("product not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DuplicateCode(_) => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence interface for products.
///
/// `insert` is an atomic insert-if-absent on `code`: a concurrent insert
/// with the same code must fail with [`StoreError::DuplicateCode`] rather
/// than write a second record. The service layer relies on this to close
/// the check-then-insert race.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product; fails on a duplicate code
    async fn insert(&self, product: Product) -> StoreResult<Product>;

    /// Get a product by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Get a product by its unique code
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>>;

    /// One page of products matching the filter, plus the total match count
    async fn list(
        &self,
        filter: &ProductFilter,
        options: &ListOptions,
    ) -> StoreResult<Paginated<Product>>;

    /// Apply a patch to an existing product
    async fn update(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<()>;

    /// Delete a product; false when nothing was deleted
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

/// In-memory implementation of [`ProductStore`] (for development/testing)
///
/// The code-uniqueness check and the write happen under one write-lock
/// acquisition, which is what makes `insert` atomic here.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let mut products = self.products.write().await;

        if products.values().any(|p| p.code == product.code) {
            return Err(StoreError::DuplicateCode(product.code));
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| p.code == code).cloned())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        options: &ListOptions,
    ) -> StoreResult<Paginated<Product>> {
        let products = self.products.read().await;

        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| {
                if let Some(ref category) = filter.category {
                    if p.category != *category {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if p.status != status {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        match options.sort {
            Some(PriceOrder::Asc) => matching.sort_by(|a, b| {
                a.price
                    .partial_cmp(&b.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            Some(PriceOrder::Desc) => matching.sort_by(|a, b| {
                b.price
                    .partial_cmp(&a.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            // Stable default: newest first.
            None => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        let total = matching.len() as u64;
        let skip = (options.page.saturating_sub(1) * options.limit) as usize;
        let items: Vec<Product> = matching
            .into_iter()
            .skip(skip)
            .take(options.limit as usize)
            .collect();

        Ok(Paginated { items, total })
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<()> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.apply_patch(patch);

        tracing::info!(product_id = %id, "Product updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Product deleted");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductOwner, NO_IMAGE_THUMBNAIL};
    use chrono::Utc;

    fn product(code: &str, price: f64, category: &str, status: bool) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::now_v7(),
            title: format!("Product {code}"),
            description: "A product".to_string(),
            price,
            thumbnail: NO_IMAGE_THUMBNAIL.to_string(),
            code: code.to_string(),
            status,
            stock: 3,
            category: category.to_string(),
            owner: ProductOwner::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    fn options(page: u64, limit: u64) -> ListOptions {
        ListOptions {
            page,
            limit,
            sort: None,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = InMemoryProductStore::new();
        let created = store.insert(product("A-1", 10.0, "misc", true)).await.unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.code, "A-1");

        let by_code = store.find_by_code("A-1").await.unwrap().unwrap();
        assert_eq!(by_code.id, created.id);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_code() {
        let store = InMemoryProductStore::new();
        store.insert(product("A-1", 10.0, "misc", true)).await.unwrap();

        let result = store.insert(product("A-1", 99.0, "misc", true)).await;
        assert!(matches!(result, Err(StoreError::DuplicateCode(code)) if code == "A-1"));
    }

    #[tokio::test]
    async fn concurrent_inserts_with_one_code_admit_exactly_one() {
        let store = InMemoryProductStore::new();

        let (first, second) = tokio::join!(
            store.insert(product("RACE", 10.0, "misc", true)),
            store.insert(product("RACE", 20.0, "misc", true)),
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);

        let stored = store.find_by_code("RACE").await.unwrap().unwrap();
        let winner = if first.is_ok() { 10.0 } else { 20.0 };
        assert_eq!(stored.price, winner);
    }

    #[tokio::test]
    async fn list_filters_by_category_and_status() {
        let store = InMemoryProductStore::new();
        store.insert(product("A-1", 10.0, "books", true)).await.unwrap();
        store.insert(product("A-2", 20.0, "books", false)).await.unwrap();
        store.insert(product("A-3", 30.0, "games", true)).await.unwrap();

        let filter = ProductFilter {
            category: Some("books".to_string()),
            status: Some(true),
        };
        let page = store.list(&filter, &options(1, 10)).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].code, "A-1");
    }

    #[tokio::test]
    async fn list_sorts_by_price() {
        let store = InMemoryProductStore::new();
        store.insert(product("A-1", 30.0, "misc", true)).await.unwrap();
        store.insert(product("A-2", 10.0, "misc", true)).await.unwrap();
        store.insert(product("A-3", 20.0, "misc", true)).await.unwrap();

        let asc = ListOptions {
            sort: Some(PriceOrder::Asc),
            ..options(1, 10)
        };
        let page = store.list(&ProductFilter::default(), &asc).await.unwrap();
        let prices: Vec<f64> = page.items.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);

        let desc = ListOptions {
            sort: Some(PriceOrder::Desc),
            ..options(1, 10)
        };
        let page = store.list(&ProductFilter::default(), &desc).await.unwrap();
        let prices: Vec<f64> = page.items.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![30.0, 20.0, 10.0]);
    }

    #[tokio::test]
    async fn list_slices_the_requested_page_and_reports_the_total() {
        let store = InMemoryProductStore::new();
        for i in 0..5 {
            store
                .insert(product(&format!("A-{i}"), f64::from(i), "misc", true))
                .await
                .unwrap();
        }

        let page = store
            .list(&ProductFilter::default(), &options(2, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);

        let last = store
            .list(&ProductFilter::default(), &options(3, 2))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
    }

    #[tokio::test]
    async fn update_applies_patch_to_existing_product() {
        let store = InMemoryProductStore::new();
        let created = store.insert(product("A-1", 10.0, "misc", true)).await.unwrap();

        store
            .update(
                created.id,
                &ProductPatch {
                    price: Some(42.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.price, 42.0);
        assert_eq!(fetched.title, created.title);
    }

    #[tokio::test]
    async fn update_missing_product_reports_not_found() {
        let store = InMemoryProductStore::new();
        let result = store.update(Uuid::now_v7(), &ProductPatch::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn delete_reports_whether_something_was_removed() {
        let store = InMemoryProductStore::new();
        let created = store.insert(product("A-1", 10.0, "misc", true)).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
    }
}
