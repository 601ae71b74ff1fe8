//! Video metadata store - the local mirror of the backend's video library
//! tables.
//!
//! The scan and sync operations reconcile these rows against the files on
//! disk and the backend's own view of the library. Rows are keyed by the
//! file path relative to a Videos storage-group directory.

mod sqlite;
mod types;

pub use sqlite::SqliteMetadataStore;
pub use types::{StoreError, VideoRow};

use std::collections::HashMap;

/// Trait for video metadata storage.
pub trait MetadataStore: Send + Sync {
    /// All known video file paths (relative to their storage directories),
    /// mapped to their row ids.
    fn filepaths(&self) -> Result<HashMap<String, i64>, StoreError>;

    /// Insert a new video row. Returns the new row id.
    fn insert_video(&self, row: &VideoRow) -> Result<i64, StoreError>;

    /// Update the row identified by `row.filename`.
    ///
    /// Returns false when no such row exists; never inserts.
    fn update_video(&self, row: &VideoRow) -> Result<bool, StoreError>;

    /// Delete the row for a video file path, along with its cast links.
    fn delete_by_filepath(&self, filename: &str) -> Result<(), StoreError>;

    /// Delete every video row, cast row, and link.
    ///
    /// Returns the number of video rows removed.
    fn delete_all(&self) -> Result<usize, StoreError>;

    /// Id of the cast row for a name, inserting it if missing.
    fn ensure_cast(&self, name: &str) -> Result<i64, StoreError>;

    /// Link a cast row to a video row. Linking twice is a no-op.
    fn link_cast(&self, video_id: i64, cast_id: i64) -> Result<(), StoreError>;
}
