//! Services API client over HTTP.
//!
//! One request helper carries the whole upstream contract: 200 decodes into
//! the endpoint's envelope, 404 becomes `None`, anything else is an error.
//! Response bodies are only ever logged, truncated, at debug level.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::metrics::{UPSTREAM_REQUESTS, UPSTREAM_REQUEST_DURATION};
use crate::query::Query;

use super::error::UpstreamError;
use super::traits::UpstreamClient;
use super::types::{
    de, Program, ProgramPage, RecRule, SchedulePlan, StorageGroupDir, VideoMetadataInfo, VideoPage,
};

/// HTTP client for the backend's Services API.
pub struct MythApiClient {
    client: Client,
    base_url: String,
}

impl MythApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Perform one Services API request. `path_and_query` is relative to
    /// the configured base URL and already encoded.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path_and_query: &str,
    ) -> Result<Option<T>, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let operation = operation_label(path_and_query);
        debug!(method, url = %url, "Upstream request");

        let request = match method {
            "POST" => self.client.post(&url),
            _ => self.client.get(&url),
        };

        let start = Instant::now();
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                UPSTREAM_REQUESTS
                    .with_label_values(&[operation, "error"])
                    .inc();
                UpstreamError::Request {
                    method,
                    url: url.clone(),
                    detail: e.to_string(),
                }
            })?;
        UPSTREAM_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        let status = response.status();
        if status.as_u16() == 404 {
            let body = response.text().await.unwrap_or_default();
            debug!(method, url = %url, body = %truncate_body(&body), "Upstream not found");
            UPSTREAM_REQUESTS
                .with_label_values(&[operation, "not_found"])
                .inc();
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(
                method,
                url = %url,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "Upstream request failed"
            );
            UPSTREAM_REQUESTS
                .with_label_values(&[operation, "error"])
                .inc();
            return Err(UpstreamError::Status {
                method,
                url,
                status: status.as_u16(),
            });
        }

        let value = response.json::<T>().await.map_err(|e| {
            UPSTREAM_REQUESTS
                .with_label_values(&[operation, "error"])
                .inc();
            UpstreamError::decode(operation, e.to_string())
        })?;
        UPSTREAM_REQUESTS.with_label_values(&[operation, "ok"]).inc();
        Ok(Some(value))
    }

    /// Request whose response is the backend's `{"bool": ...}` accept flag.
    /// A 404 counts as "not accepted".
    async fn call_update(
        &self,
        method: &'static str,
        path_and_query: &str,
    ) -> Result<bool, UpstreamError> {
        let envelope = self.call::<BoolEnvelope>(method, path_and_query).await?;
        Ok(envelope.map(|e| e.value).unwrap_or(false))
    }
}

#[async_trait]
impl UpstreamClient for MythApiClient {
    async fn hostname(&self) -> Result<String, UpstreamError> {
        let envelope = self
            .call::<HostNameEnvelope>("GET", "Myth/GetHostName")
            .await?
            .ok_or_else(|| UpstreamError::decode("Myth/GetHostName", "empty response"))?;
        Ok(envelope.value)
    }

    async fn storage_group_dirs(
        &self,
        group: &str,
    ) -> Result<Vec<StorageGroupDir>, UpstreamError> {
        let path = format!(
            "Myth/GetStorageGroupDirs?GroupName={}",
            urlencoding::encode(group)
        );
        let envelope = self.call::<StorageGroupDirListEnvelope>("GET", &path).await?;
        Ok(envelope
            .map(|e| e.StorageGroupDirList.StorageGroupDirs)
            .unwrap_or_default())
    }

    async fn video_list(&self, query: &Query) -> Result<VideoPage, UpstreamError> {
        let path = format!("Video/GetVideoList{}", paging_query(query));
        let envelope = self
            .call::<VideoListEnvelope>("GET", &path)
            .await?
            .ok_or_else(|| UpstreamError::decode("Video/GetVideoList", "empty response"))?;
        let list = envelope.VideoMetadataInfoList;
        Ok(VideoPage {
            videos: list.VideoMetadataInfos,
            total: list.TotalAvailable,
        })
    }

    async fn video(&self, id: u32) -> Result<Option<VideoMetadataInfo>, UpstreamError> {
        let path = format!("Video/GetVideo?Id={id}");
        let envelope = self.call::<VideoEnvelope>("GET", &path).await?;
        // Unknown ids come back as an empty skeleton with Id 0 on some
        // backend versions instead of a 404.
        Ok(envelope
            .map(|e| e.VideoMetadataInfo)
            .filter(|video| video.Id != 0))
    }

    async fn video_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<VideoMetadataInfo>, UpstreamError> {
        let path = format!(
            "Video/GetVideoByFileName?FileName={}",
            urlencoding::encode(filename)
        );
        let envelope = self.call::<VideoEnvelope>("GET", &path).await?;
        Ok(envelope
            .map(|e| e.VideoMetadataInfo)
            .filter(|video| video.Id != 0))
    }

    async fn update_video_metadata(
        &self,
        params: &[(String, String)],
    ) -> Result<bool, UpstreamError> {
        let path = format!("Video/UpdateVideoMetadata?{}", encode_params(params));
        self.call_update("POST", &path).await
    }

    async fn recorded_list(&self, query: &Query) -> Result<ProgramPage, UpstreamError> {
        let path = format!("Dvr/GetRecordedList{}", paging_query(query));
        let envelope = self
            .call::<ProgramListEnvelope>("GET", &path)
            .await?
            .ok_or_else(|| UpstreamError::decode("Dvr/GetRecordedList", "empty response"))?;
        let list = envelope.ProgramList;
        Ok(ProgramPage {
            programs: list.Programs,
            total: list.TotalAvailable,
        })
    }

    async fn recorded(&self, recorded_id: u32) -> Result<Option<Program>, UpstreamError> {
        let path = format!("Dvr/GetRecorded?RecordedId={recorded_id}");
        let envelope = self.call::<ProgramEnvelope>("GET", &path).await?;
        Ok(envelope.map(|e| e.Program))
    }

    async fn delete_recording(&self, recorded_id: u32) -> Result<bool, UpstreamError> {
        let path = format!("Dvr/DeleteRecording?RecordedId={recorded_id}");
        self.call_update("POST", &path).await
    }

    async fn upcoming_list(&self) -> Result<ProgramPage, UpstreamError> {
        let envelope = self
            .call::<ProgramListEnvelope>("GET", "Dvr/GetUpcomingList")
            .await?
            .ok_or_else(|| UpstreamError::decode("Dvr/GetUpcomingList", "empty response"))?;
        let list = envelope.ProgramList;
        Ok(ProgramPage {
            programs: list.Programs,
            total: list.TotalAvailable,
        })
    }

    async fn record_schedule(
        &self,
        chan_id: u32,
        start_time: &str,
    ) -> Result<Option<RecRule>, UpstreamError> {
        let path = format!(
            "Dvr/GetRecordSchedule?ChanId={}&StartTime={}",
            chan_id,
            urlencoding::encode(start_time)
        );
        let envelope = self.call::<RecRuleEnvelope>("GET", &path).await?;
        Ok(envelope.map(|e| e.RecRule))
    }

    async fn add_record_schedule(
        &self,
        plan: &SchedulePlan,
    ) -> Result<Option<u32>, UpstreamError> {
        let params = [
            ("ChanId".to_string(), plan.chan_id.to_string()),
            ("StartTime".to_string(), plan.start_time.clone()),
            ("EndTime".to_string(), plan.end_time.clone()),
            ("Station".to_string(), plan.station.clone()),
            ("Type".to_string(), plan.type_name.clone()),
            ("Title".to_string(), plan.title.clone()),
            ("FindDay".to_string(), plan.find_day.to_string()),
            ("FindTime".to_string(), plan.find_time.clone()),
        ];
        let path = format!("Dvr/AddRecordSchedule?{}", encode_params(&params));
        let envelope = self.call::<UintEnvelope>("POST", &path).await?;
        Ok(envelope.map(|e| e.value))
    }

    async fn remove_record_schedule(&self, record_id: u32) -> Result<bool, UpstreamError> {
        let path = format!("Dvr/RemoveRecordSchedule?RecordId={record_id}");
        self.call_update("POST", &path).await
    }
}

/// Metric label for a request path: the service path without parameters.
fn operation_label(path_and_query: &str) -> &str {
    path_and_query
        .split('?')
        .next()
        .unwrap_or(path_and_query)
}

/// Query-string form of the paging parameters, starting with `?` when any
/// are present.
fn paging_query(query: &Query) -> String {
    let mut out = String::new();
    for (key, value) in query.paging_params() {
        out.push(if out.is_empty() { '?' } else { '&' });
        out.push_str(key);
        out.push('=');
        out.push_str(&value);
    }
    out
}

/// Encodes `key=value` pairs for a query string. Values are percent
/// encoded, keys are known identifiers.
fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate_body(body: &str) -> String {
    body.chars().take(200).collect()
}

// Services API response envelopes
#[derive(Debug, Deserialize)]
struct HostNameEnvelope {
    #[serde(rename = "String")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct BoolEnvelope {
    #[serde(rename = "bool", deserialize_with = "de::lenient_bool")]
    value: bool,
}

#[derive(Debug, Deserialize)]
struct UintEnvelope {
    #[serde(rename = "uint", deserialize_with = "de::lenient_u32")]
    value: u32,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct StorageGroupDirListEnvelope {
    StorageGroupDirList: StorageGroupDirListBody,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct StorageGroupDirListBody {
    StorageGroupDirs: Vec<StorageGroupDir>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct VideoListEnvelope {
    VideoMetadataInfoList: VideoListBody,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct VideoListBody {
    VideoMetadataInfos: Vec<VideoMetadataInfo>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    TotalAvailable: u32,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct VideoEnvelope {
    VideoMetadataInfo: VideoMetadataInfo,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ProgramListEnvelope {
    ProgramList: ProgramListBody,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ProgramListBody {
    Programs: Vec<Program>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    TotalAvailable: u32,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ProgramEnvelope {
    Program: Program,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RecRuleEnvelope {
    RecRule: RecRule,
}
