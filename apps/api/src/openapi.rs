//! Combined OpenAPI document for the storefront API

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/api/auth", api = domain_users::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc),
    ),
    tags(
        (name = "Auth", description = "Registration, login and session identity"),
        (name = "Products", description = "Catalog listing and management")
    )
)]
pub struct ApiDoc;
