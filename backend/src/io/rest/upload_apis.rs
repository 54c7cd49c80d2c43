//! Image upload endpoint.
//!
//! Accepts a multipart form with a `file` field and returns the image as a
//! base64 data URI the client can store in a `photo` field. The image is
//! treated as an opaque binary payload; no decoding or resizing happens
//! here.

use axum::{extract::Multipart, http::StatusCode, response::IntoResponse, Json};
use base64::Engine;
use tracing::{error, info};

use shared::UploadResponse;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Accept an image file and return a storable photo reference
pub async fn upload_image(mut multipart: Multipart) -> impl IntoResponse {
    info!("POST /api/upload");

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_MIME_TYPE)
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        let data = build_data_uri(&mime_type, &bytes);
                        return (StatusCode::OK, Json(UploadResponse { data })).into_response();
                    }
                    Err(e) => {
                        error!("Failed to read upload: {}", e);
                        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
                    }
                }
            }
            Ok(None) => {
                return (StatusCode::BAD_REQUEST, "Missing 'file' field").into_response();
            }
            Err(e) => {
                error!("Malformed multipart upload: {}", e);
                return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
            }
        }
    }
}

fn build_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_data_uri() {
        let uri = build_data_uri("image/png", b"hello");
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_build_data_uri_empty_payload() {
        let uri = build_data_uri("image/jpeg", b"");
        assert_eq!(uri, "data:image/jpeg;base64,");
    }
}
