use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health
///
/// Executes a simple `SELECT 1` query to verify the database connection is
/// working. This is useful for Kubernetes readiness and liveness probes.
///
/// # Example
/// ```ignore
/// use database::postgres::{connect, check_health};
///
/// let db = connect(&db_url).await?;
///
/// // In your readiness endpoint
/// check_health(&db).await?;
/// ```
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    // Execute a simple SELECT 1 query using raw SQL
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

// Note: Actual database health check tests require a running database
// and live in the integration test suite, not here.
