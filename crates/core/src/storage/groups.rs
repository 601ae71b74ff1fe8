//! Storage-group directory resolution.
//!
//! Storage groups are named sets of directories the backend records into.
//! Resolution asks the backend which directories belong to a group on its
//! own host, and caches the answer for the life of the process (the layout
//! changes rarely). Configured overrides bypass the backend entirely, which
//! also covers setups where this service sees the directories under a
//! different mount point than the backend reports.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::error::DataError;
use crate::upstream::UpstreamClient;

/// Storage group holding the video library files.
pub const VIDEOS_GROUP: &str = "Videos";
/// Storage group holding cover art.
pub const COVERART_GROUP: &str = "Coverart";

/// Resolves storage-group names to local directories.
pub struct StorageGroups {
    upstream: Arc<dyn UpstreamClient>,
    overrides: HashMap<String, Vec<PathBuf>>,
    hostname: RwLock<Option<String>>,
    dirs: RwLock<HashMap<String, Vec<PathBuf>>>,
}

impl StorageGroups {
    /// Create a resolver over the given upstream client. `overrides` maps
    /// group names to fixed directory lists that are served without asking
    /// the backend.
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        overrides: HashMap<String, Vec<PathBuf>>,
    ) -> Self {
        Self {
            upstream,
            overrides,
            hostname: RwLock::new(None),
            dirs: RwLock::new(HashMap::new()),
        }
    }

    /// The backend's hostname, fetched once and cached.
    pub async fn hostname(&self) -> Result<String, DataError> {
        if let Some(name) = self.hostname.read().await.clone() {
            return Ok(name);
        }
        let name = self.upstream.hostname().await?;
        debug!(hostname = %name, "Resolved backend hostname");
        *self.hostname.write().await = Some(name.clone());
        Ok(name)
    }

    /// Directories for a storage group on the backend's host.
    ///
    /// Every failure mode collapses to `DataError::NoStorage`: a hostname
    /// lookup error, a directory-list error, and an empty filtered list all
    /// mean the same thing to the caller, the group's directories cannot be
    /// reached. Callers must treat that as fatal for the operation at hand:
    /// a scan run against an empty directory list would read as "every file
    /// disappeared".
    pub async fn resolve(&self, group: &str) -> Result<Vec<PathBuf>, DataError> {
        if let Some(dirs) = self.overrides.get(group) {
            return Ok(dirs.clone());
        }
        if let Some(dirs) = self.dirs.read().await.get(group) {
            return Ok(dirs.clone());
        }

        let hostname = match self.hostname().await {
            Ok(name) => name,
            Err(err) => {
                error!(group, %err, "Hostname lookup failed while resolving storage group");
                return Err(DataError::no_storage(group));
            }
        };
        let entries = match self.upstream.storage_group_dirs(group).await {
            Ok(entries) => entries,
            Err(err) => {
                error!(group, %err, "Directory listing failed while resolving storage group");
                return Err(DataError::no_storage(group));
            }
        };
        let dirs: Vec<PathBuf> = entries
            .into_iter()
            .filter(|entry| entry.HostName == hostname)
            .map(|entry| PathBuf::from(entry.DirName))
            .collect();
        if dirs.is_empty() {
            error!(group, hostname = %hostname, "Storage group has no directories on this host");
            return Err(DataError::no_storage(group));
        }

        debug!(group, count = dirs.len(), "Resolved storage group directories");
        self.dirs
            .write()
            .await
            .insert(group.to_string(), dirs.clone());
        Ok(dirs)
    }

    /// Drop the cached hostname and directory lists. The next resolution
    /// asks the backend again.
    pub async fn refresh(&self) {
        self.hostname.write().await.take();
        self.dirs.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockUpstream};
    use crate::upstream::UpstreamError;

    fn groups_over(upstream: Arc<MockUpstream>) -> StorageGroups {
        StorageGroups::new(upstream, HashMap::new())
    }

    #[tokio::test]
    async fn test_resolve_filters_by_backend_host() {
        let upstream = Arc::new(MockUpstream::new());
        upstream.set_hostname("mythtv").await;
        upstream
            .set_storage_dirs(
                "Videos",
                vec![
                    fixtures::storage_dir("mythtv", "/media/videos"),
                    fixtures::storage_dir("frontend", "/srv/videos"),
                    fixtures::storage_dir("mythtv", "/media/more-videos"),
                ],
            )
            .await;

        let groups = groups_over(upstream);
        let dirs = groups.resolve("Videos").await.unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/media/videos"),
                PathBuf::from("/media/more-videos")
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_caches_hostname_and_dirs() {
        let upstream = Arc::new(MockUpstream::new());
        upstream
            .set_storage_dirs("Videos", vec![fixtures::storage_dir("mythtv", "/media/videos")])
            .await;

        let groups = groups_over(upstream.clone());
        groups.resolve("Videos").await.unwrap();
        groups.resolve("Videos").await.unwrap();

        assert_eq!(upstream.hostname_call_count().await, 1);
        assert_eq!(upstream.dir_requests().await, vec!["Videos"]);
    }

    #[tokio::test]
    async fn test_override_bypasses_upstream() {
        let upstream = Arc::new(MockUpstream::new());
        let mut overrides = HashMap::new();
        overrides.insert(
            "Videos".to_string(),
            vec![PathBuf::from("/mnt/remapped/videos")],
        );

        let groups = StorageGroups::new(upstream.clone(), overrides);
        let dirs = groups.resolve("Videos").await.unwrap();

        assert_eq!(dirs, vec![PathBuf::from("/mnt/remapped/videos")]);
        assert_eq!(upstream.hostname_call_count().await, 0);
        assert!(upstream.dir_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_dirs_on_host_is_no_storage() {
        let upstream = Arc::new(MockUpstream::new());
        upstream
            .set_storage_dirs("Videos", vec![fixtures::storage_dir("frontend", "/srv/videos")])
            .await;

        let groups = groups_over(upstream);
        let err = groups.resolve("Videos").await.unwrap_err();
        assert!(matches!(err, DataError::NoStorage { group } if group == "Videos"));
    }

    #[tokio::test]
    async fn test_unknown_group_is_no_storage() {
        let upstream = Arc::new(MockUpstream::new());
        let groups = groups_over(upstream);
        let err = groups.resolve("Banners").await.unwrap_err();
        assert!(matches!(err, DataError::NoStorage { .. }));
    }

    #[tokio::test]
    async fn test_refresh_clears_caches() {
        let upstream = Arc::new(MockUpstream::new());
        upstream
            .set_storage_dirs("Videos", vec![fixtures::storage_dir("mythtv", "/media/videos")])
            .await;

        let groups = groups_over(upstream.clone());
        groups.resolve("Videos").await.unwrap();
        groups.refresh().await;
        groups.resolve("Videos").await.unwrap();

        assert_eq!(upstream.hostname_call_count().await, 2);
        assert_eq!(upstream.dir_requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_hostname_failure_is_no_storage() {
        let upstream = Arc::new(MockUpstream::new());
        upstream
            .set_next_error(UpstreamError::decode("Myth/GetHostName", "boom"))
            .await;

        let groups = groups_over(upstream);
        let err = groups.resolve("Videos").await.unwrap_err();
        assert!(matches!(err, DataError::NoStorage { group } if group == "Videos"));
    }

    #[tokio::test]
    async fn test_dir_listing_failure_is_no_storage() {
        let upstream = Arc::new(MockUpstream::new());
        let groups = groups_over(upstream.clone());
        groups.hostname().await.unwrap();
        upstream
            .set_next_error(UpstreamError::decode("Myth/GetStorageGroupDirs", "boom"))
            .await;

        let err = groups.resolve("Videos").await.unwrap_err();
        assert!(matches!(err, DataError::NoStorage { group } if group == "Videos"));
    }

    #[tokio::test]
    async fn test_hostname_failure_is_not_cached() {
        let upstream = Arc::new(MockUpstream::new());
        upstream
            .set_storage_dirs("Videos", vec![fixtures::storage_dir("mythtv", "/media/videos")])
            .await;
        upstream
            .set_next_error(UpstreamError::decode("Myth/GetHostName", "boom"))
            .await;

        let groups = groups_over(upstream);
        groups.resolve("Videos").await.unwrap_err();
        let dirs = groups.resolve("Videos").await.unwrap();
        assert_eq!(dirs, vec![PathBuf::from("/media/videos")]);
    }

    #[tokio::test]
    async fn test_hostname_is_memoized() {
        let upstream = Arc::new(MockUpstream::new());
        let groups = groups_over(upstream.clone());

        assert_eq!(groups.hostname().await.unwrap(), "mythtv");
        assert_eq!(groups.hostname().await.unwrap(), "mythtv");
        assert_eq!(upstream.hostname_call_count().await, 1);
    }
}
