//! Endpoints for the per-year Christmas checklist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

/// The Christmas checklist for one year
pub async fn get_checklist(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    info!("GET /api/checklist/{}", year);

    let today = Local::now().date_naive();
    match state.checklist_service.build_checklist(year, today).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Toggle the Christmas gift for a kid and year
pub async fn toggle_christmas_gift(
    State(state): State<AppState>,
    Path((kid_id, year)): Path<(String, i32)>,
) -> impl IntoResponse {
    info!("POST /api/checklist/{}/{}/toggle", kid_id, year);

    match state.checklist_service.toggle_christmas_gift(&kid_id, year).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}
