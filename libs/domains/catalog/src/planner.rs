//! Query planner: turns a filter set into a deterministic, ordered,
//! paginated fetch plan against the catalog store.
//!
//! Absent filter dimensions impose no constraint; present dimensions are
//! ANDed. The planner is pure: it performs no I/O and holds no state.

use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::{SearchFilters, SortOrder, DEFAULT_PAGE_SIZE};
use crate::reply::Reply;

/// One conjunct of the search predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive match against product name or description.
    TextSearch(String),
    /// Product must belong to this category.
    Category(Uuid),
    /// Product's brand must be a member of this set.
    BrandIn(Vec<Uuid>),
    /// Inclusive lower bound on the effective price.
    MinEffectivePrice(i64),
    /// Inclusive upper bound on the effective price.
    MaxEffectivePrice(i64),
    Featured(bool),
    InStock(bool),
    /// Nonzero sale price strictly below the list price.
    OnSale,
}

/// Deterministic, transient fetch plan derived from one filter set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub order: SortOrder,
    pub offset: u64,
    pub limit: u64,
}

impl QueryPlan {
    /// A plan matching the whole catalog; used for existence probes.
    pub fn unfiltered() -> Self {
        Self {
            predicates: Vec::new(),
            order: SortOrder::default(),
            offset: 0,
            limit: u64::from(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Build the fetch plan for a filter set.
///
/// Fails with `InvalidFilter` on an unknown sort ordinal (client bug, never
/// silently defaulted), inverted price bounds, a zero page size, or a
/// pagination offset that does not fit in a `u64`. An offset past the match
/// count is not the planner's concern: it yields an empty successful page
/// downstream.
pub fn plan(filters: &SearchFilters) -> Reply<QueryPlan> {
    let order = match SortOrder::from_ordinal(filters.sort_by) {
        Ok(order) => order,
        Err(error) => return Reply::fail(error),
    };

    if let (Some(min), Some(max)) = (filters.min_price, filters.max_price) {
        if min > max {
            return Reply::fail(CatalogError::InvalidFilter(
                "Minimum price exceeds maximum price".to_string(),
            ));
        }
    }

    if filters.page_size == 0 {
        return Reply::fail(CatalogError::InvalidFilter(
            "Page size must be at least 1".to_string(),
        ));
    }

    let Some(offset) = u64::from(filters.page).checked_mul(u64::from(filters.page_size)) else {
        return Reply::fail(CatalogError::InvalidFilter(
            "Pagination offset out of range".to_string(),
        ));
    };

    let mut predicates = Vec::new();

    if let Some(ref text) = filters.search_text {
        predicates.push(Predicate::TextSearch(text.clone()));
    }
    if let Some(category_id) = filters.category_id {
        predicates.push(Predicate::Category(category_id));
    }
    if let Some(ref brand_ids) = filters.brand_ids {
        predicates.push(Predicate::BrandIn(brand_ids.clone()));
    }
    if let Some(min) = filters.min_price {
        predicates.push(Predicate::MinEffectivePrice(min));
    }
    if let Some(max) = filters.max_price {
        predicates.push(Predicate::MaxEffectivePrice(max));
    }
    if let Some(featured) = filters.is_featured.as_bool() {
        predicates.push(Predicate::Featured(featured));
    }
    if let Some(in_stock) = filters.is_in_stock.as_bool() {
        predicates.push(Predicate::InStock(in_stock));
    }
    if filters.is_on_sale {
        predicates.push(Predicate::OnSale);
    }

    Reply::success(QueryPlan {
        predicates,
        order,
        offset,
        limit: u64::from(filters.page_size),
    })
}
