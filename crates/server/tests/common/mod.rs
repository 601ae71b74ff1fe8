//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock DVR backend injected, enabling comprehensive E2E testing
//! without a running backend.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mythward_core::config::{DatabaseConfig, LibraryConfig, ServerConfig, UpstreamConfig};
use mythward_core::testing::MockUpstream;
use mythward_core::{
    Config, MetadataStore, Recordings, SqliteMetadataStore, StorageGroups, UpstreamClient,
    VideoLibrary,
};

/// Re-export fixtures for test convenience
pub use mythward_core::testing::fixtures;

/// Test fixture for E2E testing with a mock backend.
///
/// Provides an in-process server with:
/// - A fully controllable mock backend (MockUpstream)
/// - An in-memory metadata store reachable for row-level assertions
/// - Temp directories wired in as Videos, Default, and Coverart storage
///   group overrides, each seeded with a "Science Fiction" category dir
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list_videos() {
///     let fixture = TestFixture::new().await;
///     fixture.upstream.set_videos(vec![fixtures::video_info(1, "Alien", "a.mkv")]).await;
///
///     let response = fixture.get("/api/videos").await;
///     assert_status!(response, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock backend - configure videos, recordings, and schedules
    pub upstream: Arc<MockUpstream>,
    /// Metadata store backing the library, for row-level assertions
    pub store: Arc<SqliteMetadataStore>,
    /// Videos storage group directory
    pub videos_dir: TempDir,
    /// Default (recordings) storage group directory
    pub recordings_dir: TempDir,
    /// Coverart storage group directory
    pub coverart_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response from a test request, body left as raw bytes
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_backend_url("http://127.0.0.1:6544").await
    }

    /// Create a test fixture whose relay points at the given backend URL.
    ///
    /// API calls still go through the mock; only the file relay makes
    /// real HTTP requests.
    pub async fn with_backend_url(base_url: &str) -> Self {
        let videos_dir = TempDir::new().expect("Failed to create videos dir");
        let recordings_dir = TempDir::new().expect("Failed to create recordings dir");
        let coverart_dir = TempDir::new().expect("Failed to create coverart dir");

        // Seed the category directory used by import and poster tests
        std::fs::create_dir_all(videos_dir.path().join("Science Fiction"))
            .expect("Failed to create category dir");
        std::fs::create_dir_all(coverart_dir.path().join("Science Fiction"))
            .expect("Failed to create coverart category dir");

        let config = Config {
            upstream: UpstreamConfig {
                base_url: base_url.to_string(),
                timeout_secs: 5,
            },
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            library: LibraryConfig {
                categories: HashMap::from([("SciFi".to_string(), "Science Fiction".to_string())]),
                storage_groups: HashMap::from([
                    ("Videos".to_string(), vec![videos_dir.path().to_path_buf()]),
                    (
                        "Default".to_string(),
                        vec![recordings_dir.path().to_path_buf()],
                    ),
                    (
                        "Coverart".to_string(),
                        vec![coverart_dir.path().to_path_buf()],
                    ),
                ]),
            },
        };

        // Create the mock backend and in-memory store
        let upstream = Arc::new(MockUpstream::new());
        let upstream_dyn: Arc<dyn UpstreamClient> = upstream.clone();
        let store = Arc::new(SqliteMetadataStore::in_memory().expect("Failed to create store"));
        let store_dyn: Arc<dyn MetadataStore> = store.clone();

        let storage = Arc::new(StorageGroups::new(
            upstream_dyn.clone(),
            config.library.storage_groups.clone(),
        ));
        let library = Arc::new(VideoLibrary::new(
            upstream_dyn.clone(),
            store_dyn,
            storage.clone(),
            config.library.categories.clone(),
        ));
        let recordings = Arc::new(Recordings::new(upstream_dyn));
        recordings.load_scheduled().await;

        let state = Arc::new(mythward_server::state::AppState::new(
            config,
            library,
            recordings,
            storage,
        ));
        let router = mythward_server::api::create_router(state);

        Self {
            router,
            upstream,
            store,
            videos_dir,
            recordings_dir,
            coverart_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body.as_bytes().to_vec(), "application/json")
            .await
    }

    /// Send a POST request with custom content type (for multipart bodies).
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> TestResponse {
        self.request_raw("POST", path, body, content_type).await
    }

    /// Send a GET request and keep the body as raw bytes.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            content_type,
            body,
        }
    }

    /// Send a request with raw byte body and custom content type.
    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        Self::into_test_response(response).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        Self::into_test_response(response).await
    }

    async fn into_test_response(response: axum::response::Response) -> TestResponse {
        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Build a minimal multipart body with a single file field.
pub fn multipart_body(boundary: &str, field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
