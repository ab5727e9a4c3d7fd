use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::CatalogError;

/// Default number of items per page when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Three-state flag for filter dimensions where "client didn't ask" must
/// stay distinct from "client asked for false".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Toggle {
    #[default]
    Unset,
    True,
    False,
}

impl Toggle {
    /// Lenient parse: only recognized true/false tokens set the flag,
    /// anything else leaves it unset.
    pub fn from_token(raw: Option<&str>) -> Self {
        match raw {
            Some(token) if token.eq_ignore_ascii_case("true") => Toggle::True,
            Some(token) if token.eq_ignore_ascii_case("false") => Toggle::False,
            _ => Toggle::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Toggle::Unset)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Toggle::Unset => None,
            Toggle::True => Some(true),
            Toggle::False => Some(false),
        }
    }
}

/// Delivery coordinate used for shipping estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sort order for catalog searches, resolved from the client-facing ordinal.
///
/// Ordinals: 0 featured/default, 1 price ascending, 2 price descending,
/// 3 rating descending. Anything else is rejected by the planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::FromRepr)]
#[repr(u8)]
pub enum SortOrder {
    #[default]
    Featured = 0,
    PriceAscending = 1,
    PriceDescending = 2,
    RatingDescending = 3,
}

impl SortOrder {
    pub fn from_ordinal(ordinal: i64) -> Result<Self, CatalogError> {
        u8::try_from(ordinal)
            .ok()
            .and_then(SortOrder::from_repr)
            .ok_or_else(|| CatalogError::InvalidFilter(format!("Unknown sort order: {}", ordinal)))
    }
}

/// Immutable filter set describing one search request.
///
/// Built from raw query parameters by [`SearchFilters::from_query`]; numeric
/// and boolean fields that fail to parse are treated as absent rather than
/// rejected. The sort ordinal is carried verbatim and validated by the
/// planner, which rejects unknown values instead of defaulting them.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    pub search_text: Option<String>,
    pub category_id: Option<Uuid>,
    /// Stored verbatim, duplicates included; set semantics are downstream.
    pub brand_ids: Option<Vec<Uuid>>,
    /// Inclusive lower bound on the effective price.
    pub min_price: Option<i64>,
    /// Inclusive upper bound on the effective price.
    pub max_price: Option<i64>,
    pub is_featured: Toggle,
    pub is_in_stock: Toggle,
    /// Two-state by design: an absent parameter means "not restricted to
    /// sale items", same as an explicit false.
    pub is_on_sale: bool,
    pub page: u32,
    pub page_size: u32,
    /// Raw sort ordinal; resolved and validated by the planner.
    pub sort_by: i64,
    pub delivery: Option<Coordinate>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            search_text: None,
            category_id: None,
            brand_ids: None,
            min_price: None,
            max_price: None,
            is_featured: Toggle::Unset,
            is_in_stock: Toggle::Unset,
            is_on_sale: false,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: 0,
            delivery: None,
        }
    }
}

impl SearchFilters {
    /// Build a filter set from raw query parameters.
    ///
    /// Parsing is lenient for optional dimensions (malformed values become
    /// absent), pagination falls back to its defaults, and the delivery
    /// coordinate requires both axes. Returns `InvalidFilter` only for the
    /// price-bound invariant `min_price <= max_price`.
    pub fn from_query(query: CatalogSearchQuery) -> Result<Self, CatalogError> {
        let min_price = parse_int(query.min_price.as_deref());
        let max_price = parse_int(query.max_price.as_deref());

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(CatalogError::InvalidFilter(
                    "Minimum price exceeds maximum price".to_string(),
                ));
            }
        }

        let page = parse_int(query.page.as_deref())
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(0);
        let page_size = parse_int(query.page_size.as_deref())
            .and_then(|p| u32::try_from(p).ok())
            .filter(|&p| p >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let delivery = parse_coordinate(query.pos_x.as_deref(), query.pos_y.as_deref());

        Ok(Self {
            search_text: query.search_text.filter(|text| !text.trim().is_empty()),
            category_id: parse_uuid(query.category_id.as_deref()),
            brand_ids: query
                .brand_ids
                .as_deref()
                .and_then(parse_uuid_list),
            min_price,
            max_price,
            is_featured: Toggle::from_token(query.is_featured.as_deref()),
            is_in_stock: Toggle::from_token(query.is_in_stock.as_deref()),
            is_on_sale: Toggle::from_token(query.is_on_sale.as_deref())
                .as_bool()
                .unwrap_or(false),
            page,
            page_size,
            sort_by: parse_int(query.sort_by.as_deref()).unwrap_or(0),
            delivery,
        })
    }
}

/// Raw query parameters for the catalog search endpoint.
///
/// Every field arrives as an optional string so that malformed values can be
/// treated as absent instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogSearchQuery {
    /// Free-text match against product name and description
    pub search_text: Option<String>,
    /// Category to restrict the search to
    pub category_id: Option<String>,
    /// Comma-separated list of brand ids
    pub brand_ids: Option<String>,
    /// Inclusive lower price bound (integer currency units)
    pub min_price: Option<String>,
    /// Inclusive upper price bound (integer currency units)
    pub max_price: Option<String>,
    /// "true"/"false" to restrict by the featured flag
    pub is_featured: Option<String>,
    /// "true"/"false" to restrict by the in-stock flag
    pub is_in_stock: Option<String>,
    /// "true" to restrict to products with an active sale price
    pub is_on_sale: Option<String>,
    /// Zero-based page index (default 0)
    pub page: Option<String>,
    /// Page size (default 5)
    pub page_size: Option<String>,
    /// Sort ordinal: 0 featured, 1 price asc, 2 price desc, 3 rating desc
    pub sort_by: Option<String>,
    /// Delivery coordinate X axis
    pub pos_x: Option<String>,
    /// Delivery coordinate Y axis
    pub pos_y: Option<String>,
}

/// One product row in a search result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub image: String,
    /// List price in integer currency units
    pub price: i64,
    /// Sale price; zero when the product is not on sale
    pub sale_price: i64,
    pub rating: f32,
    pub is_in_stock: bool,
    /// Filled in after the search by the estimate merger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_shipping_days: Option<i32>,
}

impl ProductSummary {
    /// Sale price when one is active, list price otherwise.
    pub fn effective_price(&self) -> i64 {
        if self.sale_price > 0 {
            self.sale_price
        } else {
            self.price
        }
    }
}

/// A page of search results plus the pagination-free match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    pub total_matches: u64,
    pub items: Vec<ProductSummary>,
}

/// Full product view for the details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: i64,
    pub sale_price: i64,
    pub rating: f32,
    pub is_in_stock: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_shipping_days: Option<i32>,
}

/// Product category; top-level categories have no parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
}

/// Product brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
}

/// Full product row shape used on the insert path (seeding).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: i64,
    pub sale_price: i64,
    pub rating: f32,
    pub is_in_stock: bool,
    pub is_featured: bool,
    /// Primary category first, then any secondary categories.
    pub category_ids: Vec<Uuid>,
}

impl ProductRecord {
    pub fn effective_price(&self) -> i64 {
        if self.sale_price > 0 {
            self.sale_price
        } else {
            self.price
        }
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            brand_id: self.brand_id,
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price,
            sale_price: self.sale_price,
            rating: self.rating,
            is_in_stock: self.is_in_stock,
            estimated_shipping_days: None,
        }
    }

    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            id: self.id,
            brand_id: self.brand_id,
            name: self.name.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            price: self.price,
            sale_price: self.sale_price,
            rating: self.rating,
            is_in_stock: self.is_in_stock,
            is_featured: self.is_featured,
            estimated_shipping_days: None,
        }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn parse_uuid(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|value| Uuid::parse_str(value.trim()).ok())
}

/// Parse a delivery coordinate from its raw axis parameters.
///
/// Both axes must parse for a coordinate to exist; each axis keeps its own
/// value.
pub fn parse_coordinate(pos_x: Option<&str>, pos_y: Option<&str>) -> Option<Coordinate> {
    let x = parse_int(pos_x).and_then(|v| i32::try_from(v).ok())?;
    let y = parse_int(pos_y).and_then(|v| i32::try_from(v).ok())?;
    Some(Coordinate::new(x, y))
}

/// Parse a comma-separated id list. All segments must parse; a single
/// malformed segment invalidates the whole list.
pub fn parse_uuid_list(raw: &str) -> Option<Vec<Uuid>> {
    let ids: Vec<Uuid> = raw
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(Uuid::parse_str)
        .collect::<Result<_, _>>()
        .ok()?;

    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_from_token() {
        assert_eq!(Toggle::from_token(Some("true")), Toggle::True);
        assert_eq!(Toggle::from_token(Some("FALSE")), Toggle::False);
        assert_eq!(Toggle::from_token(Some("yes")), Toggle::Unset);
        assert_eq!(Toggle::from_token(None), Toggle::Unset);
    }

    #[test]
    fn test_sort_order_from_ordinal() {
        assert_eq!(SortOrder::from_ordinal(0), Ok(SortOrder::Featured));
        assert_eq!(SortOrder::from_ordinal(1), Ok(SortOrder::PriceAscending));
        assert_eq!(SortOrder::from_ordinal(2), Ok(SortOrder::PriceDescending));
        assert_eq!(SortOrder::from_ordinal(3), Ok(SortOrder::RatingDescending));
        assert!(matches!(
            SortOrder::from_ordinal(7),
            Err(CatalogError::InvalidFilter(_))
        ));
        assert!(matches!(
            SortOrder::from_ordinal(-1),
            Err(CatalogError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_from_query_defaults() {
        let filters = SearchFilters::from_query(CatalogSearchQuery::default()).unwrap();
        assert_eq!(filters.page, 0);
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(filters.sort_by, 0);
        assert!(!filters.is_on_sale);
        assert_eq!(filters.is_featured, Toggle::Unset);
        assert!(filters.delivery.is_none());
    }

    #[test]
    fn test_from_query_malformed_numbers_are_absent() {
        let query = CatalogSearchQuery {
            min_price: Some("abc".to_string()),
            max_price: Some("100".to_string()),
            page: Some("not-a-page".to_string()),
            ..Default::default()
        };

        let filters = SearchFilters::from_query(query).unwrap();
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.max_price, Some(100));
        assert_eq!(filters.page, 0);
    }

    #[test]
    fn test_from_query_rejects_inverted_price_bounds() {
        let query = CatalogSearchQuery {
            min_price: Some("200".to_string()),
            max_price: Some("100".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            SearchFilters::from_query(query),
            Err(CatalogError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_from_query_zero_page_size_falls_back_to_default() {
        let query = CatalogSearchQuery {
            page_size: Some("0".to_string()),
            ..Default::default()
        };

        let filters = SearchFilters::from_query(query).unwrap();
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_query_delivery_requires_both_axes() {
        let query = CatalogSearchQuery {
            pos_x: Some("10".to_string()),
            ..Default::default()
        };
        let filters = SearchFilters::from_query(query).unwrap();
        assert!(filters.delivery.is_none());

        let query = CatalogSearchQuery {
            pos_x: Some("10".to_string()),
            pos_y: Some("20".to_string()),
            ..Default::default()
        };
        let filters = SearchFilters::from_query(query).unwrap();
        // Both axes carried independently, never one value twice.
        assert_eq!(filters.delivery, Some(Coordinate::new(10, 20)));
    }

    #[test]
    fn test_from_query_keeps_duplicate_brand_ids() {
        let brand = Uuid::new_v4();
        let query = CatalogSearchQuery {
            brand_ids: Some(format!("{},{}", brand, brand)),
            ..Default::default()
        };

        let filters = SearchFilters::from_query(query).unwrap();
        assert_eq!(filters.brand_ids, Some(vec![brand, brand]));
    }

    #[test]
    fn test_parse_uuid_list_rejects_partial_garbage() {
        let brand = Uuid::new_v4();
        assert_eq!(parse_uuid_list(&format!("{},oops", brand)), None);
        assert_eq!(parse_uuid_list(""), None);
        assert_eq!(parse_uuid_list(&brand.to_string()), Some(vec![brand]));
    }

    #[test]
    fn test_effective_price() {
        let mut product = ProductRecord {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            name: "Widget".to_string(),
            image: String::new(),
            description: String::new(),
            price: 100,
            sale_price: 0,
            rating: 4.0,
            is_in_stock: true,
            is_featured: false,
            category_ids: vec![],
        };
        assert_eq!(product.effective_price(), 100);

        product.sale_price = 60;
        assert_eq!(product.effective_price(), 60);
        assert_eq!(product.summary().effective_price(), 60);
    }
}
