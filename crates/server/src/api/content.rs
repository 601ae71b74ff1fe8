//! Relay of media files out of the backend's content service.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use mythward_core::{DataError, UpstreamError};

use super::error::ApiError;
use crate::state::AppState;

/// Query parameters for the file relay
#[derive(Debug, Deserialize)]
pub struct FileParams {
    /// Storage group holding the file
    pub group: String,
}

/// GET /api/files/{file}?group=
///
/// Stream a file out of one of the backend's storage groups. The backend
/// labels everything with a media content type of its own choosing, so the
/// relay pins `application/octet-stream`.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    Query(params): Query<FileParams>,
) -> Result<Response, ApiError> {
    let url = format!(
        "{}/Content/GetFile?FileName={}&StorageGroup={}",
        state.upstream_base_url(),
        urlencoding::encode(&file),
        urlencoding::encode(&params.group),
    );
    debug!(file = %file, group = %params.group, "Relaying file");

    let response = state
        .relay()
        .get(&url)
        .send()
        .await
        .map_err(|err| {
            DataError::from(UpstreamError::Request {
                method: "GET",
                url: url.clone(),
                detail: err.to_string(),
            })
        })?;

    let status = response.status();
    if status.as_u16() == 404 {
        return Err(DataError::not_found(format!("File not found: {}", file)).into());
    }
    if !status.is_success() {
        return Err(DataError::from(UpstreamError::Status {
            method: "GET",
            url,
            status: status.as_u16(),
        })
        .into());
    }

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(stream),
    )
        .into_response())
}
