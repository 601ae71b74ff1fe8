use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{content, handlers, recordings, videos};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Video library
        .route("/videos", get(videos::list_videos))
        .route("/videos", put(videos::update_video))
        .route("/videos/scan", post(videos::scan_videos))
        .route("/videos/sync", post(videos::sync_videos))
        .route("/videos/metadata", delete(videos::delete_metadata))
        .route("/videos/import", post(videos::import_recording))
        .route("/videos/poster", post(videos::upload_poster))
        .route("/videos/{id}", get(videos::get_video))
        // Recordings
        .route("/recordings", get(recordings::list_recordings))
        .route("/recordings/schedule", post(recordings::schedule_recording))
        .route(
            "/recordings/schedule/{id}",
            delete(recordings::unschedule_recording),
        )
        .route("/recordings/{recid}", get(recordings::get_recording))
        .route("/recordings/{recid}", delete(recordings::delete_recording))
        // File relay
        .route("/files/{*file}", get(content::get_file))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        // Health, config, and metrics live outside the API prefix
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .layer(middleware::from_fn(super::middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
