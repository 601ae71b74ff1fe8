//! Recordings API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use mythward_core::{Recording, RecordingsResponse, ScheduleRequest, ScheduledRecording};

use super::error::ApiError;
use crate::state::AppState;

/// GET /api/recordings
///
/// One page of finished recordings, optionally sorted.
pub async fn list_recordings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<RecordingsResponse>, ApiError> {
    let query = mythward_core::query::Query::parse(&params);
    let response = state.recordings().list(&query).await?;
    Ok(Json(response))
}

/// GET /api/recordings/{recid}
pub async fn get_recording(
    State(state): State<Arc<AppState>>,
    Path(recid): Path<u32>,
) -> Result<Json<Recording>, ApiError> {
    let recording = state.recordings().get(recid).await?;
    Ok(Json(recording))
}

/// DELETE /api/recordings/{recid}
///
/// Ask the backend to move the recording to its Deleted group.
pub async fn delete_recording(
    State(state): State<Arc<AppState>>,
    Path(recid): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.recordings().delete(recid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recordings/schedule
pub async fn schedule_recording(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduledRecording>), ApiError> {
    let scheduled = state.recordings().schedule(&request).await?;
    Ok((StatusCode::CREATED, Json(scheduled)))
}

/// DELETE /api/recordings/schedule/{id}
pub async fn unschedule_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.recordings().unschedule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
