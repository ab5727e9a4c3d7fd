//! Catalog API - REST server

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::PgCatalogStore;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL at {}", config.postgres.url());

    let db = database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
        .await?;

    info!("Successfully connected to PostgreSQL");

    // Initialize the application state
    let state = AppState {
        config: config.clone(),
        db: db.clone(),
    };

    // Populate an empty catalog on request; seeding writes through the same
    // store interface the request path reads from.
    if config.seed_on_startup {
        seed::seed_catalog(&PgCatalogStore::new(db.clone())).await?;
    }

    // Build REST router
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Catalog API on port {}", state.config.server.port);

    // Run REST server with graceful shutdown
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL connections");
            db.close().await.ok();
            info!("PostgreSQL connection closed");
        },
    )
    .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
