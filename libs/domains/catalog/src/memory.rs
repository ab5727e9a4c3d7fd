//! In-memory implementation of [`CatalogStore`] for development and testing.
//!
//! Evaluates the same plan semantics as the PostgreSQL store (predicate
//! conjunction over effective prices, per-ordinal ordering with the id
//! tie-break, offset/limit pagination) over a shared in-process table.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::{Brand, Category, ProductDetails, ProductRecord, ProductSummary, SortOrder};
use crate::planner::{Predicate, QueryPlan};
use crate::reply::Reply;
use crate::store::CatalogStore;

/// In-memory catalog store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<Vec<ProductRecord>>>,
    categories: Arc<RwLock<Vec<Category>>>,
    brands: Arc<RwLock<Vec<Brand>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor preloading a product set.
    pub fn with_products(products: Vec<ProductRecord>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
            ..Self::default()
        }
    }

    fn matches(product: &ProductRecord, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::TextSearch(text) => {
                let needle = text.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
            Predicate::Category(category_id) => product.category_ids.contains(category_id),
            Predicate::BrandIn(brand_ids) => brand_ids.contains(&product.brand_id),
            Predicate::MinEffectivePrice(min) => product.effective_price() >= *min,
            Predicate::MaxEffectivePrice(max) => product.effective_price() <= *max,
            Predicate::Featured(featured) => product.is_featured == *featured,
            Predicate::InStock(in_stock) => product.is_in_stock == *in_stock,
            Predicate::OnSale => product.sale_price > 0 && product.sale_price < product.price,
        }
    }

    fn matches_all(product: &ProductRecord, plan: &QueryPlan) -> bool {
        plan.predicates
            .iter()
            .all(|predicate| Self::matches(product, predicate))
    }

    /// Ordering for one sort ordinal; ties always break by id ascending so
    /// pagination is stable across repeated identical requests.
    fn compare(order: SortOrder, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        let primary = match order {
            SortOrder::Featured => b
                .is_featured
                .cmp(&a.is_featured)
                .then(b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)),
            SortOrder::PriceAscending => a.effective_price().cmp(&b.effective_price()),
            SortOrder::PriceDescending => b.effective_price().cmp(&a.effective_price()),
            SortOrder::RatingDescending => {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn count_matches(&self, plan: &QueryPlan) -> Reply<u64> {
        let products = self.products.read().await;
        let count = products
            .iter()
            .filter(|product| Self::matches_all(product, plan))
            .count();
        Reply::success(count as u64)
    }

    async fn fetch_page(&self, plan: &QueryPlan) -> Reply<Vec<ProductSummary>> {
        let products = self.products.read().await;

        let mut matched: Vec<&ProductRecord> = products
            .iter()
            .filter(|product| Self::matches_all(product, plan))
            .collect();
        matched.sort_by(|a, b| Self::compare(plan.order, a, b));

        let page: Vec<ProductSummary> = matched
            .into_iter()
            .skip(usize::try_from(plan.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(plan.limit).unwrap_or(usize::MAX))
            .map(ProductRecord::summary)
            .collect();

        Reply::from_rows(page)
    }

    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Reply<Vec<ProductSummary>> {
        let products = self.products.read().await;

        let found: Vec<ProductSummary> = ids
            .iter()
            .filter_map(|id| products.iter().find(|product| product.id == *id))
            .map(ProductRecord::summary)
            .collect();

        Reply::from_rows(found)
    }

    async fn fetch_details(&self, id: Uuid) -> Reply<ProductDetails> {
        let products = self.products.read().await;

        match products.iter().find(|product| product.id == id) {
            Some(product) => Reply::success(product.details()),
            None => Reply::empty(),
        }
    }

    async fn list_categories(&self) -> Reply<Vec<Category>> {
        let categories = self.categories.read().await;
        Reply::from_rows(categories.clone())
    }

    async fn list_brands(&self) -> Reply<Vec<Brand>> {
        let brands = self.brands.read().await;
        Reply::from_rows(brands.clone())
    }

    async fn insert_categories(&self, categories: &[Category]) -> Reply<u64> {
        if categories.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut stored = self.categories.write().await;
        stored.extend_from_slice(categories);
        Reply::success(categories.len() as u64)
    }

    async fn insert_brands(&self, brands: &[Brand]) -> Reply<u64> {
        if brands.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut stored = self.brands.write().await;
        stored.extend_from_slice(brands);
        Reply::success(brands.len() as u64)
    }

    async fn insert_products(&self, products: &[ProductRecord]) -> Reply<u64> {
        if products.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut stored = self.products.write().await;
        stored.extend_from_slice(products);
        Reply::success(products.len() as u64)
    }
}
