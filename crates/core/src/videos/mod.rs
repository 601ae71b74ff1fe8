//! Video library: listing, metadata updates, and reconciliation against
//! the files on disk.

mod library;
mod paths;
mod scan;
mod shape;
mod types;

pub use library::VideoLibrary;
pub use paths::{CategoryPaths, DerivedPath};
pub use types::{Credit, ScanOutcome, SyncOutcome, Video, VideosResponse, WebRef};
