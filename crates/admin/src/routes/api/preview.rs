//! Live Markdown preview for the post editor.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::middleware::RequireAdmin;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
    pub reading_time_minutes: u32,
}

/// Render editor Markdown exactly as the public site will.
pub async fn preview(
    _admin: RequireAdmin,
    Json(body): Json<PreviewRequest>,
) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: lumen_core::markdown::render(&body.markdown),
        reading_time_minutes: lumen_core::markdown::reading_time_minutes(&body.markdown),
    })
}
