use std::sync::Arc;
use std::time::Duration;

use mythward_core::{Config, Recordings, SanitizedConfig, StorageGroups, VideoLibrary};

/// Shared application state
pub struct AppState {
    config: Config,
    library: Arc<VideoLibrary>,
    recordings: Arc<Recordings>,
    storage: Arc<StorageGroups>,
    relay: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: Config,
        library: Arc<VideoLibrary>,
        recordings: Arc<Recordings>,
        storage: Arc<StorageGroups>,
    ) -> Self {
        // Relayed media transfers are unbounded; only the connect phase
        // gets a timeout.
        let relay = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.upstream.timeout_secs)))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            library,
            recordings,
            storage,
            relay,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn library(&self) -> &VideoLibrary {
        self.library.as_ref()
    }

    pub fn recordings(&self) -> &Recordings {
        self.recordings.as_ref()
    }

    pub fn storage(&self) -> &StorageGroups {
        self.storage.as_ref()
    }

    pub fn relay(&self) -> &reqwest::Client {
        &self.relay
    }

    pub fn upstream_base_url(&self) -> &str {
        self.config.upstream.base_url.trim_end_matches('/')
    }

    pub fn category_dir(&self, category: &str) -> Option<&str> {
        self.config
            .library
            .categories
            .get(category)
            .map(String::as_str)
    }
}
