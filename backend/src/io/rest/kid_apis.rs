//! Endpoints for managing the kid roster.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;
use shared::{CreateKidRequest, DeleteResponse, UpdateKidRequest};

/// Create a new kid
pub async fn create_kid(
    State(state): State<AppState>,
    Json(request): Json<CreateKidRequest>,
) -> impl IntoResponse {
    info!("POST /api/kids - name: {}", request.name);

    match state.kid_service.create_kid(request).await {
        Ok(kid) => (StatusCode::CREATED, Json(kid)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Get a kid by ID
pub async fn get_kid(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/kids/{}", kid_id);

    match state.kid_service.get_kid(&kid_id).await {
        Ok(Some(kid)) => (StatusCode::OK, Json(kid)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Kid not found").into_response(),
        Err(e) => error_response(e),
    }
}

/// List all kids
pub async fn list_kids(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/kids");

    match state.kid_service.list_kids().await {
        Ok(kids) => (StatusCode::OK, Json(kids)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Partially update a kid
pub async fn update_kid(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
    Json(request): Json<UpdateKidRequest>,
) -> impl IntoResponse {
    info!("PUT /api/kids/{} - request: {:?}", kid_id, request);

    match state.kid_service.update_kid(&kid_id, request).await {
        Ok(kid) => (StatusCode::OK, Json(kid)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Delete a kid and every gift recorded for them
pub async fn delete_kid(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/kids/{}", kid_id);

    match state.kid_service.delete_kid(&kid_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: "Kid deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
