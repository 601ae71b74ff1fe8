pub mod config;
pub mod error;
pub mod metadata;
pub mod metrics;
pub mod query;
pub mod recordings;
pub mod storage;
pub mod testing;
pub mod text;
pub mod upstream;
pub mod videos;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use error::DataError;
pub use metadata::{MetadataStore, SqliteMetadataStore, StoreError, VideoRow};
pub use query::{Paging, Query, Sort, SortOrder};
pub use recordings::{
    Channel, ChannelIcon, Recording, RecordingType, Recordings, RecordingsResponse,
    ScheduleRequest, ScheduledRecording,
};
pub use storage::{StorageGroups, COVERART_GROUP, VIDEOS_GROUP};
pub use upstream::{MythApiClient, UpstreamClient, UpstreamError};
pub use videos::{Credit, ScanOutcome, SyncOutcome, Video, VideoLibrary, VideosResponse, WebRef};
