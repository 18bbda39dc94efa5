// GET handlers: version, live samples, container logs, history queries

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::models::{HistoryPeriod, unix_millis};
use crate::session;
use crate::version::{NAME, VERSION};

/// Log lines returned by the container logs endpoint.
const LOG_TAIL_LINES: usize = 100;

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    period: Option<String>,
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/system: one fresh host sample (zeroed if the host source fails).
pub(super) async fn system_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(session::fetch_sample(&state.deps).await)
}

/// GET /api/containers: all workloads (empty if the runtime is unavailable).
pub(super) async fn containers_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(session::fetch_containers(&state.deps).await)
}

/// GET /api/containers/{id}/logs: last lines of one container's output, as text.
pub(super) async fn container_logs_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.deps.workloads.logs(&id, LOG_TAIL_LINES).await {
        Ok(logs) => logs.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, container = %id, operation = "container_logs", "container logs failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /api/containers/{id}/stats: one-shot resource usage; 404 for an unknown container.
pub(super) async fn container_stats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.deps.workloads.stats(&id).await {
        Ok(Some(stats)) => Json(stats).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Container not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, container = %id, operation = "container_stats", "container stats failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /api/website/status: the shared site verdict.
pub(super) async fn website_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.deps.site.latest().await)
}

/// GET /api/history/system?period=24h|7d|30d
pub(super) async fn system_history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let period = HistoryPeriod::from_query(query.period.as_deref());
    let history = state.deps.orchestrator.history();
    Json(history.query_system(period, unix_millis()).await)
}

/// GET /api/history/website?period=24h|7d|30d
pub(super) async fn website_history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let period = HistoryPeriod::from_query(query.period.as_deref());
    let history = state.deps.orchestrator.history();
    Json(history.query_site(period, unix_millis()).await)
}
