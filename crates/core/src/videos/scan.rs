//! Library reconciliation: file-system scan, metadata sync, and the
//! recording-to-video copy.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::DataError;
use crate::metadata::VideoRow;
use crate::metrics::{SCAN_FILES_ADDED, SCAN_FILES_DELETED, SCAN_RUNS, SYNC_RUNS, SYNC_VIDEOS};
use crate::recordings::Recording;
use crate::storage::VIDEOS_GROUP;

use super::library::VideoLibrary;
use super::paths::DerivedPath;
use super::types::{ScanOutcome, SyncOutcome, Video};

impl VideoLibrary {
    /// Reconcile the metadata rows against the files on disk.
    ///
    /// Every file under any resolved Videos directory is identified by its
    /// directory-relative path; a path present under several directories
    /// counts once. Rows without a file are deleted, files without a row
    /// get a placeholder row. Files on disk are never touched.
    pub async fn scan(&self) -> Result<ScanOutcome, DataError> {
        match self.run_scan().await {
            Ok(outcome) => {
                SCAN_RUNS.with_label_values(&["success"]).inc();
                SCAN_FILES_ADDED.inc_by(outcome.added.len() as u64);
                SCAN_FILES_DELETED.inc_by(outcome.deleted.len() as u64);
                Ok(outcome)
            }
            Err(err) => {
                SCAN_RUNS.with_label_values(&["failed"]).inc();
                Err(err)
            }
        }
    }

    async fn run_scan(&self) -> Result<ScanOutcome, DataError> {
        let dirs = self.storage.resolve(VIDEOS_GROUP).await?;
        let host = self.storage.hostname().await?;
        info!(?dirs, "Scanning video storage group directories");

        let mut fs_files = HashSet::new();
        for dir in &dirs {
            collect_files(dir, &mut fs_files).await?;
        }

        let db_files = self.store.filepaths()?;

        let mut deleted: Vec<String> = db_files
            .keys()
            .filter(|path| !fs_files.contains(*path))
            .cloned()
            .collect();
        deleted.sort();
        for path in &deleted {
            info!(file = %path, "Deleting metadata for unfound file");
            self.store.delete_by_filepath(path)?;
        }

        let mut added: Vec<String> = fs_files
            .into_iter()
            .filter(|path| !db_files.contains_key(path))
            .collect();
        added.sort();
        for path in &added {
            info!(file = %path, "Found new video file");
            self.store.insert_video(&VideoRow::placeholder(&host, path))?;
        }

        Ok(ScanOutcome { added, deleted })
    }

    /// Merge caller-supplied video records onto matching metadata rows.
    ///
    /// Rows are matched by derived relative path. Matched rows are updated
    /// and actor credits upserted; everything else lands under `missing`.
    /// Sync never inserts a metadata row, that is the scan's job.
    pub async fn sync(&self, videos: &[Video]) -> Result<SyncOutcome, DataError> {
        match self.run_sync(videos).await {
            Ok(outcome) => {
                SYNC_RUNS.with_label_values(&["success"]).inc();
                SYNC_VIDEOS
                    .with_label_values(&["updated"])
                    .inc_by(outcome.updated.len() as u64);
                SYNC_VIDEOS
                    .with_label_values(&["missing"])
                    .inc_by(outcome.missing.len() as u64);
                Ok(outcome)
            }
            Err(err) => {
                SYNC_RUNS.with_label_values(&["failed"]).inc();
                Err(err)
            }
        }
    }

    async fn run_sync(&self, videos: &[Video]) -> Result<SyncOutcome, DataError> {
        // Derivation only produces relative paths, but syncing against a
        // library with no storage is an error, not an empty result.
        self.storage.resolve(VIDEOS_GROUP).await?;
        let host = self.storage.hostname().await?;
        let db_files = self.store.filepaths()?;

        let mut updated = Vec::new();
        let mut missing = Vec::new();
        for video in videos {
            let filepath = match self.paths.derive(video) {
                Ok(DerivedPath::File(path)) => path,
                Ok(DerivedPath::DvdSkip) => continue,
                Err(err) => {
                    warn!(title = %video.title, error = %err, "Cannot derive media path");
                    missing.push(video.title.clone());
                    continue;
                }
            };
            match db_files.get(&filepath) {
                Some(&video_id) => {
                    info!(file = %filepath, "Updating video metadata");
                    let row = self.sync_row(&host, &filepath, video).await;
                    self.store.update_video(&row)?;
                    for credit in video.credits.as_deref().unwrap_or_default() {
                        if credit.role == "actor" {
                            let cast_id = self.store.ensure_cast(&credit.name)?;
                            self.store.link_cast(video_id, cast_id)?;
                        }
                    }
                    updated.push(video.title.clone());
                }
                None => {
                    info!(file = %filepath, "Video missing from database");
                    missing.push(filepath);
                }
            }
        }

        updated.sort();
        missing.sort();
        Ok(SyncOutcome { updated, missing })
    }

    /// Full row for a matched video, placeholder defaults plus the info
    /// fields the caller supplied.
    async fn sync_row(&self, host: &str, filepath: &str, video: &Video) -> VideoRow {
        let mut row = VideoRow::placeholder(host, filepath);
        row.contenttype = "MOVIE".to_string();

        let year = video.year.filter(|year| *year > 0);
        row.year = year.unwrap_or(0);
        if let Some(year) = year {
            row.releasedate = format!("{}-01-01", year);
        }
        row.userrating = f64::from(video.rating.unwrap_or(0.0)) * 2.0;
        if let Some(webref) = &video.webref {
            row.inetref = webref.reference.clone();
        }
        if let Some(poster) = video.poster.as_deref() {
            if let Some(coverfile) = self.coverfile(video.category.as_deref(), poster).await {
                row.coverfile = coverfile;
            }
        }
        let directors: Vec<&str> = video
            .credits
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|credit| credit.role == "director")
            .map(|credit| credit.name.as_str())
            .collect();
        if !directors.is_empty() {
            row.director = directors.join(", ");
        }
        row
    }

    /// Copy a recording's file into the video library under a category.
    ///
    /// The destination must be unknown to the backend and one of the
    /// Videos directories must already hold the category subdirectory;
    /// directories are never created. The new file is not registered
    /// here, a later scan picks it up.
    pub async fn add_from_recording(
        &self,
        recording: &Recording,
        category: &str,
    ) -> Result<Video, DataError> {
        let extension = recording
            .file
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| {
                DataError::invalid_input(format!(
                    "Recording file has no extension: {}",
                    recording.file
                ))
            })?;

        let mut video = Video {
            title: recording.title.clone(),
            category: Some(category.to_string()),
            medium: Some(extension.to_uppercase()),
            year: recording.year,
            credits: (!recording.credits.is_empty()).then(|| recording.credits.clone()),
            ..Default::default()
        };

        let destination = match self.paths.derive(&video)? {
            DerivedPath::File(path) => path,
            DerivedPath::DvdSkip => {
                return Err(DataError::invalid_input(format!(
                    "Cannot copy a DVD recording: {}",
                    recording.title
                )));
            }
        };

        if self.upstream.video_by_filename(&destination).await?.is_some() {
            return Err(DataError::conflict(format!(
                "Video already exists: {}",
                destination
            )));
        }

        let source = self.recording_source(recording).await.ok_or_else(|| {
            DataError::not_found(format!("Recording file not found: {}", recording.file))
        })?;

        let target = self.destination_path(&destination).await?;
        if tokio::fs::try_exists(&target).await? {
            return Err(DataError::conflict(format!(
                "Video file already exists: {}",
                target.display()
            )));
        }

        let bytes = tokio::fs::copy(&source, &target).await?;
        info!(
            source = %source.display(),
            target = %target.display(),
            bytes,
            "Copied recording into video library"
        );

        video.file = destination;
        Ok(video)
    }

    /// Locate the recording's file across its own storage-group
    /// directories.
    async fn recording_source(&self, recording: &Recording) -> Option<PathBuf> {
        let dirs = match self.storage.resolve(&recording.group).await {
            Ok(dirs) => dirs,
            Err(err) => {
                warn!(
                    group = %recording.group,
                    error = %err,
                    "Recording storage group did not resolve"
                );
                return None;
            }
        };
        for dir in &dirs {
            let candidate = dir.join(&recording.file);
            if path_is_file(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    /// Absolute target under the first Videos directory that already
    /// holds the destination's category subdirectory.
    async fn destination_path(&self, destination: &str) -> Result<PathBuf, DataError> {
        let dirs = self.storage.resolve(VIDEOS_GROUP).await?;
        let category_dir = destination.split('/').next().unwrap_or_default();
        for dir in &dirs {
            if path_is_dir(&dir.join(category_dir)).await {
                return Ok(dir.join(destination));
            }
        }
        Err(DataError::not_found(format!(
            "No destination directory for: {}",
            category_dir
        )))
    }
}

/// Collect files under `root` as root-relative paths. A directory the
/// backend lists but this host cannot see contributes nothing.
async fn collect_files(root: &Path, files: &mut HashSet<String>) -> Result<(), DataError> {
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %dir.display(), "Storage directory not present, skipping");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                if let Ok(rel) = path.strip_prefix(root) {
                    files.insert(rel.to_string_lossy().into_owned());
                }
            }
        }
    }
    Ok(())
}

async fn path_is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

async fn path_is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
