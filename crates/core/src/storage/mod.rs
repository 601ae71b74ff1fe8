//! Storage-group directory resolution.

mod groups;

pub use groups::{StorageGroups, COVERART_GROUP, VIDEOS_GROUP};
