//! The video library: listing, lookup, and metadata pushes.
//!
//! All reads go to the backend; nothing here is served from the local
//! metadata rows. Sorting beyond the backend's own id order is applied to
//! the returned page, after paging.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::DataError;
use crate::metadata::MetadataStore;
use crate::query::{Query, Sort, SortOrder};
use crate::storage::{StorageGroups, COVERART_GROUP};
use crate::text::trim_article;
use crate::upstream::UpstreamClient;

use super::paths::CategoryPaths;
use super::shape::{video_from_upstream, video_update_params};
use super::types::{Video, VideosResponse};

/// Video library operations against the backend and the metadata rows.
pub struct VideoLibrary {
    pub(super) upstream: Arc<dyn UpstreamClient>,
    pub(super) store: Arc<dyn MetadataStore>,
    pub(super) storage: Arc<StorageGroups>,
    pub(super) paths: CategoryPaths,
}

impl VideoLibrary {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        store: Arc<dyn MetadataStore>,
        storage: Arc<StorageGroups>,
        categories: HashMap<String, String>,
    ) -> Self {
        Self {
            upstream,
            store,
            storage,
            paths: CategoryPaths::new(categories),
        }
    }

    /// One page of the library, shaped for clients and optionally sorted.
    pub async fn list(&self, query: &Query) -> Result<VideosResponse, DataError> {
        let page = self.upstream.video_list(query).await?;
        let mut videos: Vec<Video> = page.videos.into_iter().map(video_from_upstream).collect();
        if !query.is_natural_sort("id") {
            sort_videos(&mut videos, &query.sort)?;
        }
        Ok(VideosResponse {
            videos,
            total: page.total,
        })
    }

    /// A single library entry.
    pub async fn get(&self, id: u32) -> Result<Video, DataError> {
        let info = self
            .upstream
            .video(id)
            .await?
            .ok_or_else(|| DataError::not_found(format!("Video not found: {}", id)))?;
        Ok(video_from_upstream(info))
    }

    /// Push client-edited metadata for one video to the backend.
    pub async fn update(&self, video: &Video) -> Result<(), DataError> {
        let id = video
            .id
            .ok_or_else(|| DataError::invalid_input("Video id is required"))?;

        let coverfile = match video.poster.as_deref() {
            Some(poster) => self.coverfile(video.category.as_deref(), poster).await,
            None => None,
        };

        let params = video_update_params(id, video, coverfile);
        let accepted = self.upstream.update_video_metadata(&params).await?;
        if !accepted {
            return Err(DataError::not_found("Failed to update video"));
        }
        info!(id, title = %video.title, "Updated video metadata");
        Ok(())
    }

    /// Delete every locally held metadata row. Returns how many video rows
    /// were removed.
    pub async fn delete_all_metadata(&self) -> Result<usize, DataError> {
        let removed = self.store.delete_all()?;
        info!(removed, "Cleared video metadata rows");
        Ok(removed)
    }

    /// Cover art path for a poster, when it can be placed. The update goes
    /// ahead without cover art if the category or the Coverart group is
    /// not usable.
    pub(super) async fn coverfile(&self, category: Option<&str>, poster: &str) -> Option<String> {
        let category_dir = match self.paths.category_dir(category) {
            Some(dir) => dir,
            None => {
                warn!(?category, "No category directory for poster");
                return None;
            }
        };
        match self.storage.resolve(COVERART_GROUP).await {
            Ok(dirs) => dirs
                .first()
                .map(|dir| format!("{}/{}/{}", dir.display(), category_dir, poster)),
            Err(err) => {
                warn!(error = %err, "Coverart storage group unavailable");
                None
            }
        }
    }
}

/// Sort a page of videos. `file` and `title` are the supported fields,
/// anything else is invalid input. Ties break on id.
fn sort_videos(videos: &mut [Video], sort: &Sort) -> Result<(), DataError> {
    match sort.name.as_deref().unwrap_or("id") {
        "id" => {}
        "file" => {
            videos.sort_by_cached_key(|v| (v.file.to_lowercase(), v.id.unwrap_or(0)));
        }
        "title" => {
            videos.sort_by_cached_key(|v| {
                let lower = v.title.to_lowercase();
                (trim_article(&lower).to_string(), v.id.unwrap_or(0))
            });
        }
        other => {
            return Err(DataError::invalid_input(format!(
                "Cannot sort videos by: {}",
                other
            )));
        }
    }
    if sort.order == SortOrder::Desc {
        videos.reverse();
    }
    Ok(())
}
