use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Catalog failure taxonomy.
///
/// Every message is user-safe: full diagnostic detail is logged at the
/// collaborator boundary and never carried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Malformed or out-of-range client input.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Valid request, no matching data.
    #[error("Not found")]
    NotFound,

    /// The store connection could not be established or was not open.
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(String),

    /// A query or command raised during execution.
    #[error("{0}")]
    ExecutionFailure(String),

    /// A mutating command executed but changed nothing.
    #[error("No rows altered")]
    NoRowsAffected,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidFilter(msg) => AppError::BadRequest(msg),
            CatalogError::NotFound => AppError::NotFound("Not found".to_string()),
            CatalogError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
            CatalogError::ExecutionFailure(msg) => AppError::InternalServerError(msg),
            CatalogError::NoRowsAffected => {
                AppError::InternalServerError("No rows altered".to_string())
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
