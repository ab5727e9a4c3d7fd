//! Catalog API routes

use axum::Router;
use domain_catalog::{handlers, CatalogService, PgCatalogStore, WarehouseEstimator};
use std::sync::Arc;

use crate::state::AppState;

/// Create the catalog router
pub fn router(state: &AppState) -> Router {
    let store = PgCatalogStore::new(state.db.clone());
    let estimator = Arc::new(WarehouseEstimator::default_network());
    let service = CatalogService::new(store, estimator);
    handlers::router(service)
}
