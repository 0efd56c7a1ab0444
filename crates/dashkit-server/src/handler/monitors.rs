//! Health check handler.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use dashkit_postgres::PgClient;

use crate::handler::response::HealthStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "dashkit_server::handler::monitors";

/// Reports pool health without touching the database.
async fn health_status(State(pg_client): State<PgClient>) -> (StatusCode, Json<HealthStatus>) {
    let response = HealthStatus::from_pool_status(pg_client.pool_status());

    let status_code = if response.is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy = response.is_healthy,
        waiting = response.database.waiting,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
