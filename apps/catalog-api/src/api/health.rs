//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use serde_json::Value;

use crate::state::AppState;

/// Ready only when PostgreSQL answers.
async fn ready(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
