// GET/POST handlers: version, page payloads, mark-resolved

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::AppState;
use crate::dashboard::{self, now_ms};
use crate::error::ApiError;
use crate::models::{Analytics, DailyDashboard, LiveBoard, Overview, ResolveOutcome};
use crate::version::{self, BuildInfo};

#[derive(Debug, Deserialize)]
pub(super) struct DashboardQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyticsQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> Json<BuildInfo> {
    Json(version::build_info())
}

/// GET /api/overview: today's summary and the latest detections.
pub(super) async fn overview_handler(
    State(state): State<AppState>,
) -> Result<Json<Overview>, ApiError> {
    let page = dashboard::load_overview(&state.repo, &state.config.display, now_ms()).await?;
    Ok(Json(page))
}

/// GET /api/dashboard?date=YYYY-MM-DD: one day's summary, vehicle types and violations (default: today).
pub(super) async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DailyDashboard>, ApiError> {
    let display = &state.config.display;
    let date = query
        .date
        .unwrap_or_else(|| dashboard::today(now_ms(), display.offset()));
    let page = dashboard::load_daily_dashboard(&state.repo, display, date).await?;
    Ok(Json(page))
}

/// GET /api/violations/live: active violations, newest first.
pub(super) async fn live_handler(
    State(state): State<AppState>,
) -> Result<Json<LiveBoard>, ApiError> {
    let board = dashboard::load_live_board(&state.repo, now_ms()).await?;
    Ok(Json(board))
}

/// POST /api/violations/{id}/resolve: 200 when this call resolved it, 409 when it was not active.
pub(super) async fn resolve_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ResolveOutcome>), ApiError> {
    let outcome = state.repo.mark_resolved(id, now_ms()).await?;
    match outcome {
        ResolveOutcome::Resolved { .. } => Ok((StatusCode::OK, Json(outcome))),
        ResolveOutcome::NotActive { .. } => Ok((StatusCode::CONFLICT, Json(outcome))),
        ResolveOutcome::NotFound => Err(ApiError::NotFound(id)),
    }
}

/// GET /api/analytics?start=YYYY-MM-DD&end=YYYY-MM-DD: trends over an inclusive date range.
pub(super) async fn analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Analytics>, ApiError> {
    let display = &state.config.display;
    let (start, end) = dashboard::analytics_range(
        query.start,
        query.end,
        dashboard::today(now_ms(), display.offset()),
        display.analytics_default_days,
    );
    if start > end {
        return Err(ApiError::BadRequest(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    let page = dashboard::load_analytics(&state.repo, display, start, end).await?;
    Ok(Json(page))
}
