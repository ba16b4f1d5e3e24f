// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::models::LiveMessage;
use crate::violation_repo::ViolationRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<ViolationRepo>,
    pub(crate) live_tx: broadcast::Sender<LiveMessage>,
    pub(crate) ws_live_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    repo: Arc<ViolationRepo>,
    live_tx: broadcast::Sender<LiveMessage>,
    ws_live_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        repo,
        live_tx,
        ws_live_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "parkwatch: illegal parking monitor" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/overview", get(http::overview_handler)) // GET /api/overview
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard?date=
        .route("/api/violations/live", get(http::live_handler)) // GET /api/violations/live
        .route(
            "/api/violations/{id}/resolve",
            post(http::resolve_handler),
        ) // POST /api/violations/{id}/resolve
        .route("/api/analytics", get(http::analytics_handler)) // GET /api/analytics?start=&end=
        .route("/ws/live", get(ws::ws_live)) // WS /ws/live
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
