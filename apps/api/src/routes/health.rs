//! Health check HTTP route handlers
//!
//! - `GET /health` - Full report (database, ranking service, provider credentials)
//! - `GET /health/live` - Liveness probe, never touches dependencies
//! - `GET /health/ready` - Readiness probe, 200 only when the database answers

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sqlx::PgPool;
use std::sync::Arc;
use ventaura_shared_config::ProvidersConfig;

use crate::services::health::ServiceStatus;
use crate::services::HealthService;

/// Shared application state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub providers: Arc<ProvidersConfig>,
    pub health_service: Arc<HealthService>,
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(health_report))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Full health report
///
/// # Response
/// - 200 OK when the database is healthy
/// - 503 Service Unavailable otherwise
async fn health_report(State(state): State<HealthState>) -> impl IntoResponse {
    let response = state
        .health_service
        .check_all(&state.pool, &state.providers)
        .await;

    let status_code = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// Returns 200 whenever the process can serve HTTP
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn readiness_probe(State(state): State<HealthState>) -> impl IntoResponse {
    let database = state.health_service.check_database(&state.pool).await;

    let status_code = if database.status == ServiceStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(database))
}
