//! Mapping from core data errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mythward_core::DataError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A core error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DataError);

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DataError::NotFound(_) | DataError::NoStorage { .. } => StatusCode::NOT_FOUND,
            DataError::Conflict(_) => StatusCode::CONFLICT,
            DataError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DataError::Upstream(_) | DataError::Store(_) | DataError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
