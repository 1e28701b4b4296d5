//! HTTP handlers for the catalog API.
//!
//! Deletion needs a caller identity; it is resolved from the
//! `X-User-Id` header holding a serialized session identity. Session
//! transport itself (cookies, tokens) is outside this domain.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::error_response,
    ErrorCode, UuidPath,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use domain_users::models::User;
use domain_users::repository::UserStore;
use domain_users::service::IdentityResolver;

use crate::models::{NewProduct, ProductDto, ProductListQuery, ProductPatch};
use crate::pagination::{PageResult, PageStatus};
use crate::repository::ProductStore;
use crate::service::ProductService;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        list_products_for_view,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(schemas(
        ProductDto,
        NewProduct,
        ProductPatch,
        PageResult,
        PageStatus,
        crate::models::StatusFlag,
    )),
    tags(
        (name = "Products", description = "Catalog listing and management")
    )
)]
pub struct ApiDoc;

/// State shared by the catalog handlers.
///
/// Besides the service, deletion needs the session identity contract to
/// resolve the requesting user (including the reserved admin, which no
/// store holds).
pub struct CatalogState<S: ProductStore, U: UserStore> {
    pub service: ProductService<S, U>,
    pub identities: Arc<dyn IdentityResolver>,
}

impl<S: ProductStore, U: UserStore> Clone for CatalogState<S, U> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identities: Arc::clone(&self.identities),
        }
    }
}

/// Create the products router with all HTTP endpoints
pub fn router<S, U>(state: CatalogState<S, U>) -> Router
where
    S: ProductStore + 'static,
    U: UserStore + 'static,
{
    Router::new()
        .route("/", get(list_products::<S, U>).post(create_product::<S, U>))
        .route("/view", get(list_products_for_view::<S, U>))
        .route(
            "/{id}",
            get(get_product::<S, U>)
                .put(update_product::<S, U>)
                .delete(delete_product::<S, U>),
        )
        .with_state(state)
}

/// List products as plain DTOs
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "One page of products", body = Vec<ProductDto>),
        (status = 400, description = "Invalid page number"),
        (status = 500, description = "Store failure")
    )
)]
async fn list_products<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    Query(query): Query<ProductListQuery>,
) -> Response {
    match state.service.get_products(&query).await {
        Ok(products) => Json(products).into_response(),
        Err(err) => err.into_response(),
    }
}

/// List products with pagination navigation state
#[utoipa::path(
    get,
    path = "/view",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Page with navigation links", body = PageResult),
        (status = 400, description = "Invalid page number"),
        (status = 500, description = "Store failure")
    )
)]
async fn list_products_for_view<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    Query(query): Query<ProductListQuery>,
) -> Response {
    match state.service.get_products_for_view(&query).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Product does not exist")
    )
)]
async fn get_product<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    UuidPath(id): UuidPath,
) -> Response {
    match state.service.get_product_by_id(id).await {
        Ok(product) => Json(product).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product data"),
        (status = 409, description = "Duplicate product code"),
        (status = 500, description = "Creation failure")
    )
)]
async fn create_product<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    Json(input): Json<NewProduct>,
) -> Response {
    match state.service.add_product(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Update an existing product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product does not exist"),
        (status = 500, description = "Empty patch or store failure")
    )
)]
async fn update_product<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    UuidPath(id): UuidPath,
    Json(patch): Json<ProductPatch>,
) -> Response {
    match state.service.update_product(id, &patch).await {
        Ok(product) => Json(product).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Delete a product on behalf of the caller identified by `X-User-Id`
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("X-User-Id" = Uuid, Header, description = "Serialized identity of the caller")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Missing or unknown caller identity"),
        (status = 403, description = "Caller may not delete this product"),
        (status = 404, description = "Product does not exist")
    )
)]
async fn delete_product<S: ProductStore, U: UserStore>(
    State(state): State<CatalogState<S, U>>,
    UuidPath(id): UuidPath,
    headers: HeaderMap,
) -> Response {
    let Some(requester) = resolve_requester(&state, &headers).await else {
        return error_response(
            ErrorCode::Unauthorized,
            "A valid X-User-Id header is required",
        );
    };

    match state.service.delete_product(id, &requester).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn resolve_requester<S: ProductStore, U: UserStore>(
    state: &CatalogState<S, U>,
    headers: &HeaderMap,
) -> Option<User> {
    let id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())?;

    state.identities.resolve_identity(id).await.ok().flatten()
}
