//! Shared failure taxonomy for the data components.
//!
//! Every data-component operation returns [`DataError`]; the HTTP boundary
//! owns the mapping to status codes. `NoStorage` is deliberately distinct
//! from `NotFound`: resolving zero storage-group directories is an
//! infrastructure condition, not an empty result.

use thiserror::Error;

use crate::metadata::StoreError;
use crate::upstream::UpstreamError;

/// Failures surfaced by the data components.
#[derive(Debug, Error)]
pub enum DataError {
    /// Entity or file absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Destination entity or file already exists.
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Unsupported sort field, unknown category, missing medium.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable storage-group directories resolved.
    #[error("No storage-group directories for '{group}'")]
    NoStorage { group: String },

    /// Upstream API failure (non-200, non-404).
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Metadata database failure.
    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a conflict error.
    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }

    /// Creates a no-storage error for the given group name.
    pub fn no_storage(group: impl Into<String>) -> Self {
        Self::NoStorage {
            group: group.into(),
        }
    }
}
