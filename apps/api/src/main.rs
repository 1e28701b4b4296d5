//! Storefront API - identity and catalog REST server

use axum::Router;
use axum_helpers::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::handlers::CatalogState;
use domain_products::{InMemoryProductStore, ProductService};
use domain_users::{AuthService, InMemoryCartProvisioner, InMemoryUserStore};
use std::sync::Arc;
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Development stand-ins; real deployments plug persistent stores in
    // behind the same traits.
    let users = Arc::new(InMemoryUserStore::new());
    let carts = Arc::new(InMemoryCartProvisioner::new());
    let products = Arc::new(InMemoryProductStore::new());

    let auth = AuthService::new(Arc::clone(&users), carts, &config.admin)
        .map_err(|e| eyre::eyre!("failed to initialize auth service: {}", e))?;

    let catalog = CatalogState {
        service: ProductService::new(products, Arc::clone(&users)),
        identities: Arc::new(auth.clone()),
    };

    let api_routes = Router::new()
        .nest("/auth", domain_users::handlers::router(auth))
        .nest("/products", domain_products::handlers::router(catalog));

    let router = create_router::<openapi::ApiDoc>(api_routes).merge(health_router(config.app));

    info!(
        "Starting {} v{} on {}",
        config.app.name,
        config.app.version,
        config.server.address()
    );

    create_app(router, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}
