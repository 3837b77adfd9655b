use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use imeiwatch_shared::types::api::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

/// Service health including a round-trip to the report store.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let backend = state.store.backend();
    let check = match state.store.ping() {
        Ok(()) => HealthCheck::healthy(backend),
        Err(e) => {
            tracing::warn!(error = %e, backend, "store health check failed");
            HealthCheck::unhealthy(backend, "store unavailable")
        }
    };

    let response = HealthResponse::healthy("imeiwatch-registry", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![check]);

    let status = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Prometheus exposition; empty when no recorder is installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|h| h.render())
        .unwrap_or_default()
}
