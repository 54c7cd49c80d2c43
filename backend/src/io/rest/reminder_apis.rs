//! Endpoint for the upcoming-birthday projection.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Local;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

/// Kids whose birthday falls within the next 30 days, soonest first
pub async fn get_reminders(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reminders");

    let today = Local::now().date_naive();
    match state.reminder_service.build_reminders(today).await {
        Ok(reminders) => (StatusCode::OK, Json(reminders)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialize_test_state;

    #[tokio::test]
    async fn test_get_reminders_empty_roster() {
        let state = initialize_test_state().await;

        let response = get_reminders(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
