//! HTTP handlers for the catalog API

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
    UuidPath,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    parse_coordinate, parse_uuid_list, Brand, CatalogSearchQuery, Category, Coordinate,
    ProductDetails, ProductSummary, SearchFilters, SearchResults,
};
use crate::service::CatalogService;
use crate::store::CatalogStore;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        search_catalog,
        search_by_ids,
        get_details,
        get_categories,
        get_brands,
        get_estimates,
    ),
    components(
        schemas(
            SearchResults, ProductSummary, ProductDetails,
            Category, Brand, Coordinate
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Catalog", description = "Catalog search endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all HTTP endpoints
pub fn router<S: CatalogStore + 'static>(service: CatalogService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/search", get(search_catalog))
        .route("/products", get(search_by_ids))
        .route("/details/{id}", get(get_details))
        .route("/categories", get(get_categories))
        .route("/brands", get(get_brands))
        .route("/estimates", get(get_estimates))
        .with_state(shared_service)
}

/// Search the catalog with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/search",
    tag = "Catalog",
    params(CatalogSearchQuery),
    responses(
        (status = 200, description = "Search results (empty page when nothing matches)", body = SearchResults),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn search_catalog<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(query): Query<CatalogSearchQuery>,
) -> CatalogResult<Json<SearchResults>> {
    let filters = SearchFilters::from_query(query)?;
    let results = service.search_catalog(filters).await.into_result()?;
    Ok(Json(results))
}

/// Query parameters for direct-id product lookups
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductIdsQuery {
    /// Comma-separated product ids (required)
    pub ids: Option<String>,
    /// Delivery coordinate X axis
    pub pos_x: Option<String>,
    /// Delivery coordinate Y axis
    pub pos_y: Option<String>,
}

/// Look up a specific set of products by id
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductIdsQuery),
    responses(
        (status = 200, description = "Summaries for the ids that exist", body = Vec<ProductSummary>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_ids<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(query): Query<ProductIdsQuery>,
) -> CatalogResult<Json<Vec<ProductSummary>>> {
    let ids = query
        .ids
        .as_deref()
        .and_then(parse_uuid_list)
        .ok_or_else(|| CatalogError::InvalidFilter("Invalid product ids".to_string()))?;

    let address = parse_coordinate(query.pos_x.as_deref(), query.pos_y.as_deref());
    let items = service.search_by_ids(&ids, address).await.into_result()?;
    Ok(Json(items))
}

/// Query parameters carrying an optional delivery coordinate
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PositionQuery {
    /// Delivery coordinate X axis
    pub pos_x: Option<String>,
    /// Delivery coordinate Y axis
    pub pos_y: Option<String>,
}

/// Get the full view of one product
#[utoipa::path(
    get,
    path = "/details/{id}",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        PositionQuery
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_details<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
    UuidPath(id): UuidPath,
    Query(query): Query<PositionQuery>,
) -> CatalogResult<Json<ProductDetails>> {
    let address = parse_coordinate(query.pos_x.as_deref(), query.pos_y.as_deref());
    let details = service.get_details(id, address).await.into_result()?;
    Ok(Json(details))
}

/// List all product categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "All categories", body = Vec<Category>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_categories<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
) -> CatalogResult<Json<Vec<Category>>> {
    let categories = service.get_categories().await.into_result()?;
    Ok(Json(categories))
}

/// List all product brands
#[utoipa::path(
    get,
    path = "/brands",
    tag = "Catalog",
    responses(
        (status = 200, description = "All brands", body = Vec<Brand>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_brands<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
) -> CatalogResult<Json<Vec<Brand>>> {
    let brands = service.get_brands().await.into_result()?;
    Ok(Json(brands))
}

/// Query parameters for standalone delivery estimates
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimatesQuery {
    /// Comma-separated product ids (required)
    pub ids: Option<String>,
    /// Delivery coordinate X axis (required)
    pub pos_x: Option<String>,
    /// Delivery coordinate Y axis (required)
    pub pos_y: Option<String>,
}

/// Get delivery estimates for a set of products
#[utoipa::path(
    get,
    path = "/estimates",
    tag = "Catalog",
    params(EstimatesQuery),
    responses(
        (status = 200, description = "One estimate slot per requested id, in request order", body = Vec<Option<i32>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_estimates<S: CatalogStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(query): Query<EstimatesQuery>,
) -> CatalogResult<Json<Vec<Option<i32>>>> {
    let ids = query
        .ids
        .as_deref()
        .and_then(parse_uuid_list)
        .ok_or_else(|| CatalogError::InvalidFilter("Invalid product ids".to_string()))?;

    let address = parse_coordinate(query.pos_x.as_deref(), query.pos_y.as_deref())
        .ok_or_else(|| CatalogError::InvalidFilter("Invalid address".to_string()))?;

    let estimates = service.get_estimates(&ids, address).await.into_result()?;
    Ok(Json(estimates))
}
