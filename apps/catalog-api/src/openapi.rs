//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog search with per-product delivery estimates",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/catalog", api = domain_catalog::ApiDoc)
    ),
    tags(
        (name = "Catalog", description = "Catalog search endpoints")
    )
)]
pub struct ApiDoc;
