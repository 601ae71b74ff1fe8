//! Error types for upstream API calls.

use thiserror::Error;

/// Failures talking to the DVR backend's Services API.
///
/// Response bodies never end up in these messages; they are logged
/// truncated at debug level where the request is made.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("{method} {url} failed: {detail}")]
    Request {
        method: &'static str,
        url: String,
        detail: String,
    },

    /// Non-200, non-404 response.
    #[error("{method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// Response body did not match the expected shape.
    #[error("Failed to decode {what}: {detail}")]
    Decode { what: String, detail: String },
}

impl UpstreamError {
    /// Creates a decode error.
    pub fn decode(what: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            detail: detail.into(),
        }
    }
}
