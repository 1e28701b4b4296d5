//! Catalog business logic.
//!
//! The service owns every rule the catalog enforces: listing-parameter
//! validation, pagination bounds, product-data validation, code
//! uniqueness, owner resolution and deletion authorization. The store
//! below it only persists.

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use domain_users::models::{Role, User};
use domain_users::repository::UserStore;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    ListOptions, NewProduct, Paginated, PriceOrder, Product, ProductDto, ProductFilter,
    ProductListQuery, ProductOwner, ProductPatch, NO_IMAGE_THUMBNAIL,
};
use crate::pagination::{self, PageResult};
use crate::repository::{ProductStore, StoreError};

/// Page size applied when the query does not carry one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Catalog service.
///
/// Generic over the product store and the user store; the latter is only
/// consulted for owner resolution and is shared with the identity layer.
pub struct ProductService<S: ProductStore, U: UserStore> {
    store: Arc<S>,
    users: Arc<U>,
}

impl<S: ProductStore, U: UserStore> ProductService<S, U> {
    pub fn new(store: Arc<S>, users: Arc<U>) -> Self {
        Self { store, users }
    }

    /// Parse raw listing parameters into a store filter and options.
    ///
    /// `page` must be present and parse to an integer ≥ 1; `limit`
    /// defaults to [`DEFAULT_PAGE_SIZE`]; `sort` recognizes only
    /// `asc`/`desc`; `availability` compares against the literal
    /// `"true"`.
    fn parse_list_query(query: &ProductListQuery) -> ProductResult<(ProductFilter, ListOptions)> {
        let page = match query.page.as_deref().map(str::trim) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ProductError::InvalidPage {
                    cause: format!("page must be a positive integer, got '{}'", raw),
                })?,
            None => {
                return Err(ProductError::InvalidPage {
                    cause: "page parameter is required".to_string(),
                })
            }
        };

        let limit = query
            .limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let sort = match query.sort.as_deref() {
            Some("asc") => Some(PriceOrder::Asc),
            Some("desc") => Some(PriceOrder::Desc),
            _ => None,
        };

        let filter = ProductFilter {
            category: query.category.clone().filter(|c| !c.is_empty()),
            status: query.availability.as_deref().map(|a| a == "true"),
        };

        Ok((filter, ListOptions { page, limit, sort }))
    }

    /// List one page of products as DTOs.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: &ProductListQuery) -> ProductResult<Vec<ProductDto>> {
        let (filter, options) = Self::parse_list_query(query)?;

        let page = self
            .store
            .list(&filter, &options)
            .await
            .map_err(|e| ProductError::database(&e))?;

        Ok(page.items.into_iter().map(ProductDto::from).collect())
    }

    /// List one page of products with full navigation state.
    ///
    /// Fails with `INVALID_PAGE_NUMBER` when the requested page lies
    /// beyond the last one.
    #[instrument(skip(self))]
    pub async fn get_products_for_view(
        &self,
        query: &ProductListQuery,
    ) -> ProductResult<PageResult> {
        let (filter, options) = Self::parse_list_query(query)?;

        let Paginated { items, total } = self
            .store
            .list(&filter, &options)
            .await
            .map_err(|e| ProductError::database(&e))?;

        let total_pages = pagination::total_pages(total, options.limit);
        if options.page > total_pages {
            return Err(ProductError::InvalidPage {
                cause: format!(
                    "page {} exceeds the total page count {}",
                    options.page, total_pages
                ),
            });
        }

        let payload = items.into_iter().map(ProductDto::from).collect();
        Ok(PageResult::assemble(payload, options.page, total_pages))
    }

    /// Fetch a single product.
    ///
    /// Every failure on this path, absent row or store fault, normalizes
    /// to `UNDEFINED_PRODUCT`.
    #[instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: Uuid) -> ProductResult<ProductDto> {
        match self.store.find_by_id(id).await {
            Ok(Some(product)) => Ok(ProductDto::from(product)),
            Ok(None) => Err(ProductError::Undefined {
                cause: format!("no product with id '{}'", id),
            }),
            Err(err) => Err(ProductError::Undefined {
                cause: err.to_string(),
            }),
        }
    }

    /// Validate, resolve ownership and persist a new product.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn add_product(&self, input: NewProduct) -> ProductResult<ProductDto> {
        Self::validate_new_product(&input)?;

        let owner = self.resolve_owner(input.owner.as_deref()).await?;

        // Pre-check for a friendly failure before touching the store...
        match self.store.find_by_code(&input.code).await {
            Ok(Some(_)) => {
                return Err(ProductError::DuplicateCode { code: input.code });
            }
            Ok(None) => {}
            Err(err) => return Err(ProductError::creation(&err)),
        }

        let now = chrono::Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            // Validated right above; absence would have been rejected.
            price: input.price.unwrap_or_default(),
            thumbnail: input
                .thumbnail
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NO_IMAGE_THUMBNAIL.to_string()),
            code: input.code,
            status: input.status.map(|s| s.normalize()).unwrap_or(true),
            stock: input.stock.unwrap_or_default(),
            category: input.category,
            owner,
            created_at: now,
            updated_at: now,
        };

        // ...while the store's atomic insert-if-absent closes the race the
        // pre-check cannot.
        match self.store.insert(product).await {
            Ok(stored) => Ok(ProductDto::from(stored)),
            Err(StoreError::DuplicateCode(code)) => Err(ProductError::DuplicateCode { code }),
            Err(err) => Err(ProductError::creation(&err)),
        }
    }

    /// Apply a non-empty patch to an existing product and return the
    /// updated projection.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> ProductResult<ProductDto> {
        self.get_product_by_id(id).await?;

        if patch.is_empty() {
            return Err(ProductError::EmptyUpdate);
        }

        match self.store.update(id, patch).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(ProductError::Undefined {
                    cause: format!("no product with id '{}'", id),
                })
            }
            Err(err) => return Err(ProductError::database(&err)),
        }

        self.get_product_by_id(id).await
    }

    /// Delete a product on behalf of `requester`.
    ///
    /// Permitted for administrators, and for the premium user whose email
    /// owns the product; everyone else is rejected.
    #[instrument(skip(self, requester), fields(requester = %requester.email))]
    pub async fn delete_product(&self, id: Uuid, requester: &User) -> ProductResult<()> {
        let product = self.get_product_by_id(id).await?;

        let permitted = requester.role == Role::Admin || product.owner == requester.email;
        if !permitted {
            return Err(ProductError::DeletionForbidden {
                cause: format!(
                    "user '{}' has no permission over product '{}'",
                    requester.email, product.code
                ),
            });
        }

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| ProductError::database(&e))?;

        if !deleted {
            return Err(ProductError::Undefined {
                cause: format!("no product with id '{}'", id),
            });
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    fn validate_new_product(input: &NewProduct) -> ProductResult<()> {
        let mut violations: Vec<String> = Vec::new();

        if input.title.trim().is_empty() {
            violations.push("title is required".to_string());
        }
        if input.description.trim().is_empty() {
            violations.push("description is required".to_string());
        }
        if input.code.trim().is_empty() {
            violations.push("code is required".to_string());
        }
        if input.category.trim().is_empty() {
            violations.push("category is required".to_string());
        }

        match input.price {
            Some(price) if price.is_finite() && price > 0.0 => {}
            Some(price) => violations.push(format!("price must be greater than 0, got {}", price)),
            None => violations.push("price is required".to_string()),
        }

        match input.stock {
            Some(stock) if stock >= 0 => {}
            Some(stock) => violations.push(format!("stock must not be negative, got {}", stock)),
            None => violations.push("stock is required".to_string()),
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ProductError::InvalidData {
                cause: violations.join("; "),
            })
        }
    }

    /// Resolve the supplied creator email to a product owner.
    ///
    /// Only an existing premium account claims ownership; any other input
    /// falls back to the admin literal.
    async fn resolve_owner(&self, owner: Option<&str>) -> ProductResult<ProductOwner> {
        let Some(email) = owner else {
            return Ok(ProductOwner::Admin);
        };

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| ProductError::Creation {
                cause: e.to_string(),
                status: e.status(),
            })?;

        Ok(match user {
            Some(user) if user.role == Role::Premium => ProductOwner::Premium(user.email),
            _ => ProductOwner::Admin,
        })
    }
}

impl<S: ProductStore, U: UserStore> Clone for ProductService<S, U> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            users: Arc::clone(&self.users),
        }
    }
}
