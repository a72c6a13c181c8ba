//! Image uploads for featured images and project screenshots.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;

use super::ApiError;
use crate::middleware::RequireAdmin;
use crate::services::{MediaError, MediaStore, StoredMedia};
use crate::state::AppState;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Store one uploaded image and return its public URL.
///
/// # Errors
///
/// 400 for a missing or malformed file field, the media error's status
/// for rejected files, 500 when the file cannot be written.
#[instrument(skip_all)]
pub async fn upload(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StoredMedia>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

        return state
            .media()
            .save(&content_type, &bytes)
            .await
            .map(Json)
            .map_err(media_error);
    }

    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        format!("Missing `{FILE_FIELD}` field"),
    ))
}

fn media_error(err: MediaError) -> ApiError {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(error = %err, "Failed to store upload");
        ApiError::new(status, "Could not store the file")
    } else {
        ApiError::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_hides_io_details() {
        let err = MediaError::Io(std::io::Error::other("/srv/media: permission denied"));
        let api = media_error(err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("/srv/media"));
    }

    #[test]
    fn test_media_error_keeps_client_reason() {
        let api = media_error(MediaError::UnsupportedType("text/html".to_owned()));
        assert_eq!(api.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(api.error.contains("text/html"));
    }
}
