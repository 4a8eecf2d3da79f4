//! Liveness and readiness endpoints

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, health_router, run_health_checks};
use sea_orm::DatabaseConnection;

use crate::state::AppState;

/// `/ready` pings Postgres when one is configured; in-memory mode is
/// always ready.
async fn ready(State(db): State<Option<DatabaseConnection>>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    if let Some(db) = &db {
        let probe: HealthCheckFuture<'_> = Box::pin(async move {
            database::postgres::check_health(db)
                .await
                .map_err(|e| e.to_string())
        });
        checks.push(("postgres", probe));
    }

    run_health_checks(checks).await
}

/// `/health` and `/ready`, mounted outside `/api`
pub fn router(state: &AppState) -> Router {
    let readiness = Router::new()
        .route("/ready", get(ready))
        .with_state(state.db.clone());

    health_router(state.config.app.clone()).merge(readiness)
}
