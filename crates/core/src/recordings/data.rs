//! Recorded-program listing and the record-schedule workflow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::error::DataError;
use crate::query::{Query, Sort, SortOrder};
use crate::text::trim_article;
use crate::upstream::{Program, SchedulePlan, UpstreamClient};

use super::shape::{parse_time, recording_from_program, scheduled_from_program};
use super::types::{
    Recording, RecordingType, RecordingsResponse, ScheduleRequest, ScheduledRecording,
};

/// Recorded programs and the scheduled-recordings index.
///
/// The index mirrors the backend's upcoming list so schedule lookups by
/// channel and start time stay in-process. It is loaded once at startup
/// and maintained incrementally by [`Recordings::schedule`] and
/// [`Recordings::unschedule`].
pub struct Recordings {
    upstream: Arc<dyn UpstreamClient>,
    scheduled: RwLock<Vec<ScheduledRecording>>,
}

impl Recordings {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            upstream,
            scheduled: RwLock::new(Vec::new()),
        }
    }

    /// List recorded programs. Entries in the backend's `Deleted` group
    /// are filtered out; `total` still reflects the backend's full count.
    pub async fn list(&self, query: &Query) -> Result<RecordingsResponse, DataError> {
        let page = self.upstream.recorded_list(query).await?;
        let mut recordings: Vec<Recording> = page
            .programs
            .into_iter()
            .filter(|program| !in_deleted_group(program))
            .map(recording_from_program)
            .collect();
        debug!(count = recordings.len(), "Retrieved recordings");

        if !query.is_natural_sort("start") {
            sort_recordings(&mut recordings, &query.sort)?;
        }

        Ok(RecordingsResponse {
            recordings,
            total: page.total,
        })
    }

    /// One recording. `Deleted`-group entries and programs without
    /// recording info read as not found.
    pub async fn get(&self, recid: u32) -> Result<Recording, DataError> {
        let program = self
            .upstream
            .recorded(recid)
            .await?
            .filter(|program| program.Recording.is_some() && !in_deleted_group(program))
            .ok_or_else(|| DataError::not_found(format!("Recording not found: {}", recid)))?;
        Ok(recording_from_program(program))
    }

    /// Delete a recording on the backend.
    pub async fn delete(&self, recid: u32) -> Result<(), DataError> {
        let deleted = self.upstream.delete_recording(recid).await?;
        if !deleted {
            return Err(DataError::not_found(format!(
                "Recording not found: {}",
                recid
            )));
        }
        info!(recid, "Deleted recording");
        Ok(())
    }

    /// Load the scheduled-recordings index from the backend's upcoming
    /// list. A failure leaves the previous index in place.
    pub async fn load_scheduled(&self) {
        info!("Loading scheduled recordings");
        match self.upstream.upcoming_list().await {
            Ok(page) => {
                let scheduled: Vec<ScheduledRecording> = page
                    .programs
                    .into_iter()
                    .map(scheduled_from_program)
                    .collect();
                info!(count = scheduled.len(), "Loaded scheduled recordings");
                *self.scheduled.write().await = scheduled;
            }
            Err(err) => error!(error = %err, "Failed to load scheduled recordings"),
        }
    }

    /// Schedule a program to record. The backend is asked for its rule
    /// template for the program, which is posted back with the requested
    /// type name.
    pub async fn schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduledRecording, DataError> {
        let rec_type = RecordingType::from_id(request.kind).ok_or_else(|| {
            error!(kind = request.kind, "Invalid recording type");
            DataError::invalid_input("Invalid recording type")
        })?;

        info!(
            channel_id = request.channel_id,
            start = %request.start,
            "Getting recording schedule"
        );
        let rule = self
            .upstream
            .record_schedule(request.channel_id, &request.start.to_rfc3339())
            .await?
            .ok_or_else(|| DataError::not_found("Failed to get recording schedule"))?;

        info!(title = %rule.Title, kind = rec_type.as_str(), "Scheduling recording");
        let plan = SchedulePlan {
            chan_id: rule.ChanId,
            start_time: rule.StartTime.clone(),
            end_time: rule.EndTime.clone(),
            station: rule.CallSign.clone(),
            type_name: rec_type.as_str().to_string(),
            title: rule.Title.clone(),
            find_day: rule.FindDay,
            find_time: rule.FindTime.clone(),
        };
        let id = self
            .upstream
            .add_record_schedule(&plan)
            .await?
            .ok_or_else(|| {
                DataError::not_found(format!("Failed to schedule: {}", rule.Title))
            })?;

        let scheduled = ScheduledRecording {
            id,
            channel_id: request.channel_id,
            start: parse_time(&rule.StartTime),
            kind: request.kind,
            status: "WillRecord".to_string(),
        };
        self.set_scheduled(scheduled.clone()).await;
        Ok(scheduled)
    }

    /// Remove a record rule and drop it from the index.
    pub async fn unschedule(&self, id: u32) -> Result<(), DataError> {
        info!(id, "Unscheduling recording");
        let removed = self.upstream.remove_record_schedule(id).await?;
        if !removed {
            return Err(DataError::not_found(format!("Recording not found: {}", id)));
        }
        self.remove_scheduled(id).await;
        Ok(())
    }

    /// Index entry for a channel and start time. With several matching
    /// entries the highest record type wins (an all-records rule shadows
    /// a single-record rule).
    pub async fn find_scheduled(
        &self,
        channel_id: u32,
        start: DateTime<Utc>,
    ) -> Option<ScheduledRecording> {
        let scheduled = self.scheduled.read().await;
        scheduled
            .iter()
            .filter(|entry| entry.channel_id == channel_id && entry.start == start)
            .max_by_key(|entry| entry.kind)
            .cloned()
    }

    async fn set_scheduled(&self, entry: ScheduledRecording) {
        let mut scheduled = self.scheduled.write().await;
        match scheduled
            .iter_mut()
            .find(|existing| {
                existing.channel_id == entry.channel_id && existing.start == entry.start
            }) {
            Some(existing) => *existing = entry,
            None => scheduled.push(entry),
        }
    }

    async fn remove_scheduled(&self, id: u32) {
        self.scheduled.write().await.retain(|entry| entry.id != id);
    }
}

fn in_deleted_group(program: &Program) -> bool {
    program
        .Recording
        .as_ref()
        .and_then(|info| info.RecGroup.as_deref())
        == Some("Deleted")
}

fn sort_recordings(recordings: &mut [Recording], sort: &Sort) -> Result<(), DataError> {
    match sort.name.as_deref().unwrap_or("start") {
        "start" => {}
        "title" => {
            recordings.sort_by_cached_key(|rec| (sort_title(rec), rec.start));
        }
        "year" => {
            recordings.sort_by_cached_key(|rec| (rec.year.unwrap_or(0), sort_title(rec)));
        }
        "rating" => {
            recordings.sort_by(|a, b| {
                a.rating
                    .total_cmp(&b.rating)
                    .then_with(|| sort_title(a).cmp(&sort_title(b)))
            });
        }
        "channel" => {
            recordings
                .sort_by_cached_key(|rec| (channel_key(&rec.channel.number), sort_title(rec)));
        }
        "category" => {
            recordings.sort_by_cached_key(|rec| (rec.category.clone(), sort_title(rec)));
        }
        "size" => {
            recordings.sort_by_cached_key(|rec| (rec.size, sort_title(rec)));
        }
        other => {
            return Err(DataError::invalid_input(format!(
                "Cannot sort recordings by: {}",
                other
            )));
        }
    }
    if sort.order == SortOrder::Desc {
        recordings.reverse();
    }
    Ok(())
}

fn sort_title(recording: &Recording) -> String {
    let lower = recording.title.to_lowercase();
    trim_article(&lower).to_string()
}

/// Numeric key for display channel numbers like `"7_1"`, so channel 10
/// sorts after channel 2. Unparsable segments key as zero.
fn channel_key(number: &str) -> (u32, u32) {
    let mut parts = number.splitn(2, |c: char| !c.is_ascii_digit());
    let major = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    (major, minor)
}
