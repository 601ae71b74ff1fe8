//! The client seam for the DVR backend.

use async_trait::async_trait;

use crate::query::Query;

use super::error::UpstreamError;
use super::types::{
    Program, ProgramPage, RecRule, SchedulePlan, StorageGroupDir, VideoMetadataInfo, VideoPage,
};

/// Typed access to the DVR backend's Services API.
///
/// Lookups return `Ok(None)` for a definite upstream "not found" (a 404,
/// or the empty placeholder entity some backend versions serve instead);
/// any other non-200 response is an error.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// `Myth/GetHostName`.
    async fn hostname(&self) -> Result<String, UpstreamError>;

    /// `Myth/GetStorageGroupDirs`, unfiltered (entries for every host).
    async fn storage_group_dirs(&self, group: &str)
        -> Result<Vec<StorageGroupDir>, UpstreamError>;

    /// `Video/GetVideoList` with the query's paging parameters.
    async fn video_list(&self, query: &Query) -> Result<VideoPage, UpstreamError>;

    /// `Video/GetVideo`.
    async fn video(&self, id: u32) -> Result<Option<VideoMetadataInfo>, UpstreamError>;

    /// `Video/GetVideoByFileName`.
    async fn video_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<VideoMetadataInfo>, UpstreamError>;

    /// `Video/UpdateVideoMetadata`. Returns the backend's accept flag.
    async fn update_video_metadata(
        &self,
        params: &[(String, String)],
    ) -> Result<bool, UpstreamError>;

    /// `Dvr/GetRecordedList` with the query's paging parameters.
    async fn recorded_list(&self, query: &Query) -> Result<ProgramPage, UpstreamError>;

    /// `Dvr/GetRecorded`.
    async fn recorded(&self, recorded_id: u32) -> Result<Option<Program>, UpstreamError>;

    /// `Dvr/DeleteRecording`. Returns the backend's accept flag.
    async fn delete_recording(&self, recorded_id: u32) -> Result<bool, UpstreamError>;

    /// `Dvr/GetUpcomingList`.
    async fn upcoming_list(&self) -> Result<ProgramPage, UpstreamError>;

    /// `Dvr/GetRecordSchedule` for a channel and start time.
    async fn record_schedule(
        &self,
        chan_id: u32,
        start_time: &str,
    ) -> Result<Option<RecRule>, UpstreamError>;

    /// `Dvr/AddRecordSchedule`. Returns the new rule id, or `None` when
    /// the backend refuses the rule.
    async fn add_record_schedule(&self, plan: &SchedulePlan)
        -> Result<Option<u32>, UpstreamError>;

    /// `Dvr/RemoveRecordSchedule`. Returns the backend's accept flag.
    async fn remove_record_schedule(&self, record_id: u32) -> Result<bool, UpstreamError>;
}
