//! Handler for standalone image uploads.
//!
//! The outfit editor renders its canvas to an image and uploads it here
//! before saving, then passes the returned URL as the outfit's preview.
//! Nothing is written to the database; unused uploads simply age out of
//! the snapshot prefix.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use wardrobe_storage::keys;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Extension used when the uploaded file has none.
const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/v1/uploads
///
/// Store the `file` part of a multipart form and return its public URL.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let key = keys::snapshot_key(&extension);
        state.blob_store.put(&key, bytes, &content_type).await?;
        let url = state.blob_store.public_url(&key);

        tracing::info!(key = %key, "Image uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: UploadResponse { url },
            }),
        ));
    }

    Err(AppError::BadRequest("A 'file' part is required".into()))
}
