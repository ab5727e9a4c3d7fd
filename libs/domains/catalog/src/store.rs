use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Brand, Category, ProductDetails, ProductRecord, ProductSummary};
use crate::planner::QueryPlan;
use crate::reply::Reply;

/// Persistence collaborator seam for the catalog.
///
/// The engine does not know how the store is connected or pooled; it only
/// hands over a [`QueryPlan`] and receives a [`Reply`]. Implementations must
/// keep "the store failed" and "the query matched nothing" distinct: a
/// genuine connectivity or execution fault is a `Failure`, a correctly
/// executed query with zero rows is `Empty` (or `Success(0)` for counts).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Count every product matching the plan's predicates, ignoring
    /// pagination.
    async fn count_matches(&self, plan: &QueryPlan) -> Reply<u64>;

    /// Fetch one ordered page of matching products, bounded by the plan's
    /// offset and limit.
    async fn fetch_page(&self, plan: &QueryPlan) -> Reply<Vec<ProductSummary>>;

    /// Fetch summaries for the given ids, in request order. Unknown ids are
    /// skipped without a placeholder; zero matches is `Empty`.
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Reply<Vec<ProductSummary>>;

    /// Fetch the full product view; `Empty` when the id is unknown.
    async fn fetch_details(&self, id: Uuid) -> Reply<ProductDetails>;

    async fn list_categories(&self) -> Reply<Vec<Category>>;

    async fn list_brands(&self) -> Reply<Vec<Brand>>;

    /// Insert categories; a mutation that alters zero rows is a
    /// `NoRowsAffected` failure.
    async fn insert_categories(&self, categories: &[Category]) -> Reply<u64>;

    /// Insert brands; same zero-rows semantics as `insert_categories`.
    async fn insert_brands(&self, brands: &[Brand]) -> Reply<u64>;

    /// Insert full product records (with their category links); same
    /// zero-rows semantics as `insert_categories`.
    async fn insert_products(&self, products: &[ProductRecord]) -> Reply<u64>;
}
