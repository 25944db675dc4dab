use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    /// Filename offered to the client; defaults to the key's last segment.
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

/// Store the request body as an object
pub async fn upload_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    tracing::info!("Received upload: bucket={}, key={}, size={}", bucket, key, body.len());

    let size = body.len();
    state.accessor.put_bytes(&bucket, &key, body).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { bucket, key, size })))
}

/// Send an object back as an attachment
pub async fn download_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let name = params
        .name
        .unwrap_or_else(|| default_display_name(&key).to_string());

    state.accessor.serve_file(&bucket, &key, &name).await
}

/// Resolve a logical name (key up to its first `.`) and send the matching object
pub async fn download_by_name(
    State(state): State<AppState>,
    Path((bucket, name)): Path<(String, String)>,
) -> ApiResult<Response> {
    let key = state
        .accessor
        .find_object(&bucket, &name)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no object named '{}' in bucket '{}'", name, bucket))
        })?;

    Ok(state.accessor.serve_file(&bucket, &key, &key).await)
}

fn default_display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
