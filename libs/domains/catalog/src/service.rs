//! Catalog service: composes the planner, the store, and the estimate
//! merger into the outward-facing search operations.

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::estimate::{DeliveryEstimator, EstimateMerger};
use crate::models::{
    Brand, Category, Coordinate, ProductDetails, ProductSummary, SearchFilters, SearchResults,
};
use crate::planner;
use crate::reply::Reply;
use crate::store::CatalogStore;

/// Stateless per-request orchestration over the two collaborators.
///
/// The count and page queries run concurrently (both read-only); the
/// estimate call runs strictly after the page query because it needs the
/// resulting id list.
pub struct CatalogService<S: CatalogStore> {
    store: Arc<S>,
    merger: EstimateMerger,
}

impl<S: CatalogStore> CatalogService<S> {
    pub fn new(store: S, estimator: Arc<dyn DeliveryEstimator>) -> Self {
        Self {
            store: Arc::new(store),
            merger: EstimateMerger::new(estimator),
        }
    }

    /// Filtered, sorted, paginated catalog search with delivery estimates.
    ///
    /// Zero matches is a valid, displayable result: `Success` with
    /// `total_matches = 0` and no items, never a failure. The merger is
    /// invoked even for that empty page to keep the collaborator surface
    /// uniform.
    #[instrument(skip(self, filters), fields(page = filters.page, page_size = filters.page_size))]
    pub async fn search_catalog(&self, filters: SearchFilters) -> Reply<SearchResults> {
        let plan = match planner::plan(&filters) {
            Reply::Success(plan) => plan,
            Reply::Empty => return Reply::empty(),
            Reply::Failure(error) => return Reply::fail(error),
        };

        // Both queries are read-only with no ordering dependency.
        let (count_reply, page_reply) = tokio::join!(
            self.store.count_matches(&plan),
            self.store.fetch_page(&plan)
        );

        let total_matches = match count_reply {
            Reply::Success(count) => count,
            Reply::Empty => 0,
            Reply::Failure(error) => return Reply::fail(error),
        };

        let mut items = match page_reply {
            Reply::Success(items) => items,
            Reply::Empty => Vec::new(),
            Reply::Failure(error) => return Reply::fail(error),
        };

        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        let estimates = self.merger.merge(&ids, filters.delivery).await;
        for (item, estimate) in items.iter_mut().zip(estimates) {
            item.estimated_shipping_days = estimate;
        }

        Reply::success(SearchResults {
            total_matches,
            items,
        })
    }

    /// Direct-id lookup used by non-filtered flows.
    ///
    /// Unknown ids produce no placeholder; when none of the ids exist the
    /// reply is `Empty`.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn search_by_ids(
        &self,
        ids: &[Uuid],
        address: Option<Coordinate>,
    ) -> Reply<Vec<ProductSummary>> {
        match self.store.fetch_by_ids(ids).await {
            Reply::Success(mut items) => {
                let found_ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
                let estimates = self.merger.merge(&found_ids, address).await;
                for (item, estimate) in items.iter_mut().zip(estimates) {
                    item.estimated_shipping_days = estimate;
                }
                Reply::success(items)
            }
            Reply::Empty => Reply::empty(),
            Reply::Failure(error) => Reply::fail(error),
        }
    }

    /// Single-product view with an estimate when a coordinate is supplied.
    #[instrument(skip(self))]
    pub async fn get_details(
        &self,
        id: Uuid,
        address: Option<Coordinate>,
    ) -> Reply<ProductDetails> {
        match self.store.fetch_details(id).await {
            Reply::Success(mut details) => {
                let estimates = self.merger.merge(&[details.id], address).await;
                details.estimated_shipping_days = estimates.first().copied().flatten();
                Reply::success(details)
            }
            Reply::Empty => Reply::empty(),
            Reply::Failure(error) => Reply::fail(error),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Reply<Vec<Category>> {
        self.store.list_categories().await
    }

    #[instrument(skip(self))]
    pub async fn get_brands(&self) -> Reply<Vec<Brand>> {
        self.store.list_brands().await
    }

    /// Standalone estimate lookup; the address is required here.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn get_estimates(
        &self,
        ids: &[Uuid],
        address: Coordinate,
    ) -> Reply<Vec<Option<i32>>> {
        Reply::success(self.merger.merge(ids, Some(address)).await)
    }
}

impl<S: CatalogStore> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            merger: self.merger.clone(),
        }
    }
}
