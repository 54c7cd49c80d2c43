//! Endpoints for managing the gift log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;
use shared::{CreateGiftRequest, DeleteResponse, UpdateGiftRequest};

/// Record a new gift
pub async fn create_gift(
    State(state): State<AppState>,
    Json(request): Json<CreateGiftRequest>,
) -> impl IntoResponse {
    info!("POST /api/gifts - kid_id: {}, name: {}", request.kid_id, request.gift_name);

    match state.gift_service.create_gift(request).await {
        Ok(gift) => (StatusCode::CREATED, Json(gift)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Get a gift by ID
pub async fn get_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/gifts/{}", gift_id);

    match state.gift_service.get_gift(&gift_id).await {
        Ok(Some(gift)) => (StatusCode::OK, Json(gift)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Gift not found").into_response(),
        Err(e) => error_response(e),
    }
}

/// List all gifts
pub async fn list_gifts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/gifts");

    match state.gift_service.list_gifts().await {
        Ok(gifts) => (StatusCode::OK, Json(gifts)).into_response(),
        Err(e) => error_response(e),
    }
}

/// List one kid's gifts, newest year first
pub async fn list_gifts_for_kid(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/gifts/kid/{}", kid_id);

    match state.gift_service.list_gifts_for_kid(&kid_id).await {
        Ok(gifts) => (StatusCode::OK, Json(gifts)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Partially update a gift
pub async fn update_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
    Json(request): Json<UpdateGiftRequest>,
) -> impl IntoResponse {
    info!("PUT /api/gifts/{} - request: {:?}", gift_id, request);

    match state.gift_service.update_gift(&gift_id, request).await {
        Ok(gift) => (StatusCode::OK, Json(gift)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Delete a gift
pub async fn delete_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/gifts/{}", gift_id);

    match state.gift_service.delete_gift(&gift_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: "Gift deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
