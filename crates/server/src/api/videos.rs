//! Video library API handlers.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use mythward_core::{
    DataError, ScanOutcome, SyncOutcome, Video, VideosResponse, COVERART_GROUP,
};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for copying a recording into the video library
#[derive(Debug, Deserialize)]
pub struct ImportBody {
    /// Recorded id of the source recording
    pub recid: u32,
    /// Client-side category the video lands under
    pub category: String,
}

/// Query parameters for a poster upload
#[derive(Debug, Deserialize)]
pub struct PosterParams {
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteMetadataResponse {
    pub deleted: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/videos
///
/// One page of the video library, optionally sorted.
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VideosResponse>, ApiError> {
    let query = mythward_core::query::Query::parse(&params);
    let response = state.library().list(&query).await?;
    Ok(Json(response))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Video>, ApiError> {
    let video = state.library().get(id).await?;
    Ok(Json(video))
}

/// PUT /api/videos
///
/// Push client-edited metadata to the backend. Echoes the video back.
pub async fn update_video(
    State(state): State<Arc<AppState>>,
    Json(video): Json<Video>,
) -> Result<Json<Video>, ApiError> {
    state.library().update(&video).await?;
    Ok(Json(video))
}

/// POST /api/videos/scan
///
/// Reconcile metadata rows against the files in the Videos storage group.
pub async fn scan_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let outcome = state.library().scan().await?;
    Ok(Json(outcome))
}

/// POST /api/videos/sync
///
/// Push client-tracked videos into matching metadata rows.
pub async fn sync_videos(
    State(state): State<Arc<AppState>>,
    Json(videos): Json<Vec<Video>>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let outcome = state.library().sync(&videos).await?;
    Ok(Json(outcome))
}

/// DELETE /api/videos/metadata
pub async fn delete_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteMetadataResponse>, ApiError> {
    let deleted = state.library().delete_all_metadata().await?;
    Ok(Json(DeleteMetadataResponse { deleted }))
}

/// POST /api/videos/import
///
/// Copy a finished recording's file into the video library.
pub async fn import_recording(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ImportBody>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let recording = state.recordings().get(body.recid).await?;
    let video = state
        .library()
        .add_from_recording(&recording, &body.category)
        .await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// POST /api/videos/poster?category=
///
/// Store an uploaded poster image in the category's cover art directory.
pub async fn upload_poster(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PosterParams>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PosterResponse>), ApiError> {
    let category_dir = state
        .category_dir(&params.category)
        .ok_or_else(|| {
            DataError::invalid_input(format!("Unknown category: {}", params.category))
        })?
        .to_string();

    let dirs = state.storage().resolve(COVERART_GROUP).await?;
    let mut target_dir = None;
    for dir in &dirs {
        let candidate = dir.join(&category_dir);
        if tokio::fs::metadata(&candidate)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            target_dir = Some(candidate);
            break;
        }
    }
    let target_dir = target_dir.ok_or_else(|| {
        DataError::not_found(format!("No cover art directory for: {}", category_dir))
    })?;

    // Parse multipart form
    let mut poster_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            match field.bytes().await {
                Ok(bytes) => poster_data = Some(bytes.to_vec()),
                Err(err) => {
                    return Err(DataError::invalid_input(format!(
                        "Failed to read file: {}",
                        err
                    ))
                    .into())
                }
            }
        }
    }

    let poster_data = poster_data
        .ok_or_else(|| DataError::invalid_input("Missing 'file' field in poster upload"))?;
    let filename =
        filename.ok_or_else(|| DataError::invalid_input("Poster upload has no filename"))?;
    // The filename lands directly under the category directory.
    if filename.is_empty() || filename.contains('/') || filename.contains("..") {
        return Err(
            DataError::invalid_input(format!("Invalid poster filename: {}", filename)).into(),
        );
    }

    tokio::fs::write(target_dir.join(&filename), &poster_data)
        .await
        .map_err(DataError::from)?;
    info!(file = %filename, dir = %target_dir.display(), "Stored poster");

    Ok((StatusCode::CREATED, Json(PosterResponse { file: filename })))
}
