//! Mock upstream client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::query::Query;
use crate::upstream::{
    Program, ProgramPage, RecRule, SchedulePlan, StorageGroupDir, UpstreamClient, UpstreamError,
    VideoMetadataInfo, VideoPage,
};

/// Mock implementation of the UpstreamClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable hostname, storage dirs, videos, and programs
/// - Track lookups and mutations for assertions
/// - Simulate failures with one-shot error injection
///
/// # Example
///
/// ```rust,ignore
/// use mythward_core::testing::{fixtures, MockUpstream};
///
/// let upstream = MockUpstream::new();
/// upstream.set_videos(vec![
///     fixtures::video_info(1, "Alien", "SciFi/Alien.mp4"),
/// ]).await;
///
/// let page = upstream.video_list(&Query::default()).await?;
/// assert_eq!(page.total, 1);
/// ```
pub struct MockUpstream {
    /// Backend hostname to report.
    hostname: Arc<RwLock<String>>,
    /// Storage-group directory entries keyed by group name.
    storage_dirs: Arc<RwLock<HashMap<String, Vec<StorageGroupDir>>>>,
    /// Videos served by list and lookup calls.
    videos: Arc<RwLock<Vec<VideoMetadataInfo>>>,
    /// Recorded programs served by `recorded_list` and `recorded`.
    programs: Arc<RwLock<Vec<Program>>>,
    /// Programs served by `upcoming_list`.
    upcoming: Arc<RwLock<Vec<Program>>>,
    /// Rule returned by `record_schedule`.
    rec_rule: Arc<RwLock<Option<RecRule>>>,
    /// Rule id returned by `add_record_schedule`.
    add_schedule_result: Arc<RwLock<Option<u32>>>,
    /// Accept flag for `update_video_metadata`.
    update_accepted: Arc<RwLock<bool>>,
    /// Accept flag for `delete_recording`.
    delete_accepted: Arc<RwLock<bool>>,
    /// Accept flag for `remove_record_schedule`.
    remove_accepted: Arc<RwLock<bool>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<UpstreamError>>>,
    /// Number of `hostname` calls made.
    hostname_calls: Arc<RwLock<usize>>,
    /// Group names passed to `storage_group_dirs`.
    dir_requests: Arc<RwLock<Vec<String>>>,
    /// Parameter sets passed to `update_video_metadata`.
    updates: Arc<RwLock<Vec<Vec<(String, String)>>>>,
    /// Recording ids passed to `delete_recording`.
    deleted: Arc<RwLock<Vec<u32>>>,
    /// Plans passed to `add_record_schedule`.
    added_schedules: Arc<RwLock<Vec<SchedulePlan>>>,
    /// Rule ids passed to `remove_record_schedule`.
    removed_schedules: Arc<RwLock<Vec<u32>>>,
}

impl std::fmt::Debug for MockUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockUpstream").finish()
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUpstream {
    /// Create a new mock upstream reporting hostname "mythtv".
    pub fn new() -> Self {
        Self {
            hostname: Arc::new(RwLock::new("mythtv".to_string())),
            storage_dirs: Arc::new(RwLock::new(HashMap::new())),
            videos: Arc::new(RwLock::new(Vec::new())),
            programs: Arc::new(RwLock::new(Vec::new())),
            upcoming: Arc::new(RwLock::new(Vec::new())),
            rec_rule: Arc::new(RwLock::new(None)),
            add_schedule_result: Arc::new(RwLock::new(None)),
            update_accepted: Arc::new(RwLock::new(true)),
            delete_accepted: Arc::new(RwLock::new(true)),
            remove_accepted: Arc::new(RwLock::new(true)),
            next_error: Arc::new(RwLock::new(None)),
            hostname_calls: Arc::new(RwLock::new(0)),
            dir_requests: Arc::new(RwLock::new(Vec::new())),
            updates: Arc::new(RwLock::new(Vec::new())),
            deleted: Arc::new(RwLock::new(Vec::new())),
            added_schedules: Arc::new(RwLock::new(Vec::new())),
            removed_schedules: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the hostname reported by the backend.
    pub async fn set_hostname(&self, hostname: &str) {
        *self.hostname.write().await = hostname.to_string();
    }

    /// Set the directory entries for a storage group.
    pub async fn set_storage_dirs(&self, group: &str, dirs: Vec<StorageGroupDir>) {
        self.storage_dirs
            .write()
            .await
            .insert(group.to_string(), dirs);
    }

    /// Set the videos served by list and lookup calls.
    pub async fn set_videos(&self, videos: Vec<VideoMetadataInfo>) {
        *self.videos.write().await = videos;
    }

    /// Add a single video.
    pub async fn add_video(&self, video: VideoMetadataInfo) {
        self.videos.write().await.push(video);
    }

    /// Set the recorded programs.
    pub async fn set_programs(&self, programs: Vec<Program>) {
        *self.programs.write().await = programs;
    }

    /// Set the upcoming programs.
    pub async fn set_upcoming(&self, programs: Vec<Program>) {
        *self.upcoming.write().await = programs;
    }

    /// Set the rule returned by `record_schedule`.
    pub async fn set_rec_rule(&self, rule: Option<RecRule>) {
        *self.rec_rule.write().await = rule;
    }

    /// Set the rule id returned by `add_record_schedule`.
    pub async fn set_add_schedule_result(&self, result: Option<u32>) {
        *self.add_schedule_result.write().await = result;
    }

    /// Set the accept flag for `update_video_metadata`.
    pub async fn set_update_accepted(&self, accepted: bool) {
        *self.update_accepted.write().await = accepted;
    }

    /// Set the accept flag for `delete_recording`.
    pub async fn set_delete_accepted(&self, accepted: bool) {
        *self.delete_accepted.write().await = accepted;
    }

    /// Set the accept flag for `remove_record_schedule`.
    pub async fn set_remove_accepted(&self, accepted: bool) {
        *self.remove_accepted.write().await = accepted;
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: UpstreamError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of `hostname` calls made so far.
    pub async fn hostname_call_count(&self) -> usize {
        *self.hostname_calls.read().await
    }

    /// Group names requested via `storage_group_dirs`, in order.
    pub async fn dir_requests(&self) -> Vec<String> {
        self.dir_requests.read().await.clone()
    }

    /// Parameter sets sent to `update_video_metadata`, in order.
    pub async fn recorded_updates(&self) -> Vec<Vec<(String, String)>> {
        self.updates.read().await.clone()
    }

    /// Recording ids passed to `delete_recording`.
    pub async fn deleted_recordings(&self) -> Vec<u32> {
        self.deleted.read().await.clone()
    }

    /// Plans passed to `add_record_schedule`.
    pub async fn added_schedules(&self) -> Vec<SchedulePlan> {
        self.added_schedules.read().await.clone()
    }

    /// Rule ids passed to `remove_record_schedule`.
    pub async fn removed_schedules(&self) -> Vec<u32> {
        self.removed_schedules.read().await.clone()
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Result<(), UpstreamError> {
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn hostname(&self) -> Result<String, UpstreamError> {
        self.take_error().await?;
        *self.hostname_calls.write().await += 1;
        Ok(self.hostname.read().await.clone())
    }

    async fn storage_group_dirs(
        &self,
        group: &str,
    ) -> Result<Vec<StorageGroupDir>, UpstreamError> {
        self.take_error().await?;
        self.dir_requests.write().await.push(group.to_string());
        Ok(self
            .storage_dirs
            .read()
            .await
            .get(group)
            .cloned()
            .unwrap_or_default())
    }

    async fn video_list(&self, _query: &Query) -> Result<VideoPage, UpstreamError> {
        self.take_error().await?;
        let videos = self.videos.read().await.clone();
        let total = videos.len() as u32;
        Ok(VideoPage { videos, total })
    }

    async fn video(&self, id: u32) -> Result<Option<VideoMetadataInfo>, UpstreamError> {
        self.take_error().await?;
        Ok(self
            .videos
            .read()
            .await
            .iter()
            .find(|video| video.Id == id)
            .cloned())
    }

    async fn video_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<VideoMetadataInfo>, UpstreamError> {
        self.take_error().await?;
        Ok(self
            .videos
            .read()
            .await
            .iter()
            .find(|video| video.FileName == filename)
            .cloned())
    }

    async fn update_video_metadata(
        &self,
        params: &[(String, String)],
    ) -> Result<bool, UpstreamError> {
        self.take_error().await?;
        self.updates.write().await.push(params.to_vec());
        Ok(*self.update_accepted.read().await)
    }

    async fn recorded_list(&self, _query: &Query) -> Result<ProgramPage, UpstreamError> {
        self.take_error().await?;
        let programs = self.programs.read().await.clone();
        let total = programs.len() as u32;
        Ok(ProgramPage { programs, total })
    }

    async fn recorded(&self, recorded_id: u32) -> Result<Option<Program>, UpstreamError> {
        self.take_error().await?;
        Ok(self
            .programs
            .read()
            .await
            .iter()
            .find(|program| {
                program
                    .Recording
                    .as_ref()
                    .is_some_and(|rec| rec.RecordedId == recorded_id)
            })
            .cloned())
    }

    async fn delete_recording(&self, recorded_id: u32) -> Result<bool, UpstreamError> {
        self.take_error().await?;
        self.deleted.write().await.push(recorded_id);
        Ok(*self.delete_accepted.read().await)
    }

    async fn upcoming_list(&self) -> Result<ProgramPage, UpstreamError> {
        self.take_error().await?;
        let programs = self.upcoming.read().await.clone();
        let total = programs.len() as u32;
        Ok(ProgramPage { programs, total })
    }

    async fn record_schedule(
        &self,
        _chan_id: u32,
        _start_time: &str,
    ) -> Result<Option<RecRule>, UpstreamError> {
        self.take_error().await?;
        Ok(self.rec_rule.read().await.clone())
    }

    async fn add_record_schedule(
        &self,
        plan: &SchedulePlan,
    ) -> Result<Option<u32>, UpstreamError> {
        self.take_error().await?;
        self.added_schedules.write().await.push(plan.clone());
        Ok(*self.add_schedule_result.read().await)
    }

    async fn remove_record_schedule(&self, record_id: u32) -> Result<bool, UpstreamError> {
        self.take_error().await?;
        self.removed_schedules.write().await.push(record_id);
        Ok(*self.remove_accepted.read().await)
    }
}
