// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::hub::BroadcastHub;
use crate::session::PollerDeps;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) deps: PollerDeps,
    pub(crate) hub: Arc<BroadcastHub>,
    pub(crate) config: AppConfig,
}

pub fn app(deps: PollerDeps, hub: Arc<BroadcastHub>, config: AppConfig) -> Router {
    let state = AppState { deps, hub, config };
    Router::new()
        .route("/", get(|| async { "homedash: dashboard backend is running" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/system", get(http::system_handler)) // GET /api/system
        .route("/api/containers", get(http::containers_handler)) // GET /api/containers
        .route("/api/containers/{id}/logs", get(http::container_logs_handler)) // GET /api/containers/{id}/logs
        .route("/api/containers/{id}/stats", get(http::container_stats_handler)) // GET /api/containers/{id}/stats
        .route("/api/website/status", get(http::website_status_handler)) // GET /api/website/status
        .route("/api/history/system", get(http::system_history_handler)) // GET /api/history/system?period=
        .route("/api/history/website", get(http::website_history_handler)) // GET /api/history/website?period=
        .route("/ws", get(ws::ws_dashboard)) // WS /ws
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
