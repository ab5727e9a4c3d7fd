//! Catalog Domain
//!
//! Product-catalog search with delivery-estimate composition: an arbitrary,
//! partially-populated filter set becomes a deterministic, paginated, sorted
//! query against the catalog store, and per-product delivery estimates from
//! the inventory collaborator are merged onto the page without disturbing
//! its order.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────────┐
//! │   Service   │────▶│ EstimateMerger  │  ← positional zip of estimates
//! └──────┬──────┘     └────────┬────────┘
//!        │                     │
//! ┌──────▼──────┐     ┌────────▼────────┐
//! │   Planner   │     │DeliveryEstimator│  ← inventory collaborator (trait)
//! └──────┬──────┘     └─────────────────┘
//!        │
//! ┌──────▼──────┐
//! │CatalogStore │  ← persistence collaborator (trait + Pg + in-memory)
//! └─────────────┘
//! ```
//!
//! Every engine operation reports through the three-state [`Reply`] rather
//! than exceptions: `Success`, `Empty` (completed, nothing found, not an
//! error), or `Failure` with a sanitized diagnostic.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_catalog::{
//!     handlers, CatalogService, PgCatalogStore, WarehouseEstimator,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = database::postgres::connect("postgresql://localhost/catalog").await?;
//!
//! let store = PgCatalogStore::new(db);
//! let estimator = Arc::new(WarehouseEstimator::default_network());
//! let service = CatalogService::new(store, estimator);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod estimate;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod planner;
pub mod postgres;
pub mod reply;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use estimate::{DeliveryEstimator, EstimateMerger, WarehouseEstimator};
pub use handlers::ApiDoc;
pub use memory::InMemoryCatalogStore;
pub use models::{
    Brand, CatalogSearchQuery, Category, Coordinate, ProductDetails, ProductRecord,
    ProductSummary, SearchFilters, SearchResults, SortOrder, Toggle, DEFAULT_PAGE_SIZE,
};
pub use planner::{plan, Predicate, QueryPlan};
pub use postgres::PgCatalogStore;
pub use reply::Reply;
pub use service::CatalogService;
pub use store::CatalogStore;
