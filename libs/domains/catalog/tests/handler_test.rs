//! Handler tests for the catalog domain.
//!
//! These verify the HTTP surface only (query parsing, status codes,
//! response bodies) against the in-memory store, without the full
//! application router or middleware stack.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

use domain_catalog::{
    handlers, Brand, CatalogService, CatalogStore, Category, Coordinate, DeliveryEstimator,
    InMemoryCatalogStore, ProductRecord, ProductSummary, SearchResults,
};

/// Estimator that answers a fixed number of days for every id.
struct FixedEstimator(i32);

#[async_trait]
impl DeliveryEstimator for FixedEstimator {
    async fn estimate_delivery(
        &self,
        product_ids: &[Uuid],
        address: Option<Coordinate>,
    ) -> Vec<Option<i32>> {
        match address {
            Some(_) => product_ids.iter().map(|_| Some(self.0)).collect(),
            None => vec![None; product_ids.len()],
        }
    }
}

fn product(seq: u128, name: &str, price: i64, category: Option<Uuid>) -> ProductRecord {
    ProductRecord {
        id: Uuid::from_u128(seq),
        brand_id: Uuid::from_u128(1000 + seq),
        name: name.to_string(),
        image: format!("{}.jpg", seq),
        description: format!("{} description", name),
        price,
        sale_price: 0,
        rating: 4.0,
        is_in_stock: true,
        is_featured: false,
        category_ids: category.into_iter().collect(),
    }
}

fn app(store: InMemoryCatalogStore) -> axum::Router {
    let service = CatalogService::new(store, Arc::new(FixedEstimator(3)));
    handlers::router(service)
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_search_returns_paged_results() {
    let category = Uuid::from_u128(77);
    let products = (1..=8)
        .map(|seq| product(seq as u128, &format!("Item {}", seq), seq * 100, Some(category)))
        .collect();
    let app = app(InMemoryCatalogStore::with_products(products));

    let uri = format!(
        "/search?category_id={}&page=0&page_size=5&sort_by=1",
        category
    );
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let results: SearchResults = json_body(response.into_body()).await;
    assert_eq!(results.total_matches, 8);
    assert_eq!(results.items.len(), 5);
}

#[tokio::test]
async fn test_search_with_zero_matches_is_200_with_empty_page() {
    let app = app(InMemoryCatalogStore::new());

    let response = get(app, "/search?search_text=nothing").await;

    assert_eq!(response.status(), StatusCode::OK);
    let results: SearchResults = json_body(response.into_body()).await;
    assert_eq!(results.total_matches, 0);
    assert!(results.items.is_empty());
}

#[tokio::test]
async fn test_search_rejects_unknown_sort_ordinal() {
    let app = app(InMemoryCatalogStore::new());

    let response = get(app, "/search?sort_by=9").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_rejects_inverted_price_bounds() {
    let app = app(InMemoryCatalogStore::new());

    let response = get(app, "/search?min_price=500&max_price=100").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_treats_malformed_optional_filters_as_absent() {
    let app = app(InMemoryCatalogStore::with_products(vec![product(
        1, "Widget", 100, None,
    )]));

    // Garbled category and boolean are dropped, not rejected.
    let response = get(app, "/search?category_id=oops&is_featured=maybe").await;

    assert_eq!(response.status(), StatusCode::OK);
    let results: SearchResults = json_body(response.into_body()).await;
    assert_eq!(results.total_matches, 1);
}

#[tokio::test]
async fn test_search_merges_estimates_when_coordinates_present() {
    let app = app(InMemoryCatalogStore::with_products(vec![product(
        1, "Widget", 100, None,
    )]));

    let response = get(app, "/search?pos_x=10&pos_y=20").await;

    assert_eq!(response.status(), StatusCode::OK);
    let results: SearchResults = json_body(response.into_body()).await;
    assert_eq!(results.items[0].estimated_shipping_days, Some(3));
}

#[tokio::test]
async fn test_products_lookup_by_ids() {
    let first = product(1, "First", 100, None);
    let second = product(2, "Second", 200, None);
    let app = app(InMemoryCatalogStore::with_products(vec![
        first.clone(),
        second.clone(),
    ]));

    let uri = format!("/products?ids={},{}", first.id, second.id);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<ProductSummary> = json_body(response.into_body()).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, first.id);
}

#[tokio::test]
async fn test_products_lookup_rejects_malformed_ids() {
    let app = app(InMemoryCatalogStore::new());

    let response = get(app, "/products?ids=not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_products_lookup_returns_404_when_nothing_matches() {
    let app = app(InMemoryCatalogStore::new());

    let response = get(app, &format!("/products?ids={}", Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_details_found_and_missing() {
    let widget = product(1, "Widget", 100, None);
    let store = InMemoryCatalogStore::with_products(vec![widget.clone()]);

    let response = get(app(store.clone()), &format!("/details/{}", widget.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app(store.clone()), &format!("/details/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app(store), "/details/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categories_and_brands_listing() {
    let store = InMemoryCatalogStore::new();
    store
        .insert_categories(&[Category {
            id: Uuid::new_v4(),
            parent_id: None,
            name: "Office".to_string(),
        }])
        .await
        .into_result()
        .unwrap();
    store
        .insert_brands(&[Brand {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
        }])
        .await
        .into_result()
        .unwrap();

    let response = get(app(store.clone()), "/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let categories: Vec<Category> = json_body(response.into_body()).await;
    assert_eq!(categories.len(), 1);

    let response = get(app(store), "/brands").await;
    assert_eq!(response.status(), StatusCode::OK);
    let brands: Vec<Brand> = json_body(response.into_body()).await;
    assert_eq!(brands[0].name, "Acme");
}

#[tokio::test]
async fn test_categories_listing_empty_is_404() {
    let response = get(app(InMemoryCatalogStore::new()), "/categories").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_estimates_require_ids_and_address() {
    let widget = product(1, "Widget", 100, None);
    let store = InMemoryCatalogStore::with_products(vec![widget.clone()]);

    let response = get(
        app(store.clone()),
        &format!("/estimates?ids={}&pos_x=10&pos_y=20", widget.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let estimates: Vec<Option<i32>> = json_body(response.into_body()).await;
    assert_eq!(estimates, vec![Some(3)]);

    // Missing one axis is an invalid address.
    let response = get(
        app(store.clone()),
        &format!("/estimates?ids={}&pos_x=10", widget.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app(store), "/estimates?pos_x=10&pos_y=20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_insert_is_visible_to_search() {
    // Seeding writes through the same store interface the search reads from.
    let store = InMemoryCatalogStore::new();
    store
        .insert_products(&[product(1, "Widget", 100, None)])
        .await
        .into_result()
        .unwrap();

    let response = get(app(store), "/search").await;
    assert_eq!(response.status(), StatusCode::OK);
    let results: SearchResults = json_body(response.into_body()).await;
    assert_eq!(results.total_matches, 1);
}
