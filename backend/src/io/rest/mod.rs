//! REST endpoints for the gift tracker.
//!
//! Handlers are a pure translation layer: log the request, call the
//! service, map the result onto a status code and JSON body. Validation
//! failures come back as 400, missing records as 404, storage failures
//! as 500.

pub mod checklist_apis;
pub mod gift_apis;
pub mod kid_apis;
pub mod reminder_apis;
pub mod upload_apis;

pub use checklist_apis::*;
pub use gift_apis::*;
pub use kid_apis::*;
pub use reminder_apis::*;
pub use upload_apis::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::DomainError;

/// Translate a domain error into an HTTP response.
pub(crate) fn error_response(error: DomainError) -> Response {
    match error {
        DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        DomainError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
        DomainError::Storage(e) => {
            tracing::error!("Storage error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Storage error").into_response()
        }
    }
}
