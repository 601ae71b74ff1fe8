//! Category directory mapping and media path derivation.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DataError;

use super::types::Video;

/// Where a video's media file is expected to live, derived from its
/// category and medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedPath {
    /// Path relative to a Videos storage-group directory.
    File(String),
    /// DVD rips are directory trees with no single media file.
    DvdSkip,
}

/// Maps category names to the directories that hold their files.
///
/// The mapping comes from configuration; a category outside it cannot be
/// placed on disk and is reported as invalid input.
#[derive(Debug, Clone, Default)]
pub struct CategoryPaths {
    categories: HashMap<String, String>,
}

impl CategoryPaths {
    pub fn new(categories: HashMap<String, String>) -> Self {
        Self { categories }
    }

    /// Directory for a category name, if the category is known.
    pub fn category_dir(&self, category: Option<&str>) -> Option<&str> {
        category.and_then(|name| self.categories.get(name).map(String::as_str))
    }

    /// Expected relative path of a video's media file:
    /// `{category dir}/{title}.{lowercased medium}`.
    pub fn derive(&self, video: &Video) -> Result<DerivedPath, DataError> {
        let category_dir = self.category_dir(video.category.as_deref()).ok_or_else(|| {
            DataError::invalid_input(format!(
                "Unknown category {:?} for video: {}",
                video.category, video.title
            ))
        })?;

        let medium = video.medium.as_deref().ok_or_else(|| {
            DataError::invalid_input(format!("No medium for video: {}", video.title))
        })?;

        if medium == "DVD" {
            debug!(title = %video.title, "DVD rip has no media file");
            return Ok(DerivedPath::DvdSkip);
        }

        Ok(DerivedPath::File(format!(
            "{}/{}.{}",
            category_dir,
            video.title,
            medium.to_lowercase()
        )))
    }
}
