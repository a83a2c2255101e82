use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use matchbot_shared::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

/// Liveness plus a store probe and broker status.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.db.get() {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn) {
            Ok(_) => HealthCheck::healthy("database"),
            Err(e) => HealthCheck::with_status("database", HealthStatus::Unhealthy, e.to_string()),
        },
        Err(e) => HealthCheck::with_status("database", HealthStatus::Unhealthy, e.to_string()),
    };

    let broker = match &state.rabbitmq {
        Some(client) if client.is_connected() => HealthCheck::healthy("broker"),
        Some(_) => HealthCheck::with_status("broker", HealthStatus::Degraded, "channel not connected"),
        None => HealthCheck::with_status("broker", HealthStatus::Healthy, "not configured, notifications are logged"),
    };

    let response = HealthResponse::healthy("matchbot-matching", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![database, broker]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Prometheus exposition; empty when no recorder is installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
