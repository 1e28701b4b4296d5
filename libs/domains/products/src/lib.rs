//! Products Domain
//!
//! Catalog access layer: validation, pagination, DTO projection and
//! ownership-based deletion authorization for products.
//!
//! The layering follows the workspace convention:
//! handlers (HTTP) → [`service::ProductService`] (rules and decisions) →
//! [`repository::ProductStore`] (persistence interface) → [`models`]
//! (entities, DTOs, page results).
//!
//! Only [`models::ProductDto`] ever crosses the domain boundary; stored
//! records and their bookkeeping fields stay internal.

pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductErrorCode, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    ListOptions, NewProduct, Paginated, PriceOrder, Product, ProductDto, ProductFilter,
    ProductListQuery, ProductOwner, ProductPatch,
};
pub use pagination::{PageResult, PageStatus};
pub use repository::{InMemoryProductStore, ProductStore, StoreError};
pub use service::ProductService;
