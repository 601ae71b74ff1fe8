//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upstream Services API requests
//! - Library scan and sync runs

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Upstream API Metrics
// =============================================================================

/// Upstream requests total by operation and outcome.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mythward_upstream_requests_total",
            "Total upstream Services API requests",
        ),
        &["operation", "status"], // status: "ok", "not_found", "error"
    )
    .unwrap()
});

/// Upstream request duration in seconds.
pub static UPSTREAM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mythward_upstream_request_duration_seconds",
            "Duration of upstream Services API requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Library Reconciliation Metrics
// =============================================================================

/// Scan runs total by result.
pub static SCAN_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mythward_scan_runs_total", "Total library scan runs"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Metadata rows inserted by scans.
pub static SCAN_FILES_ADDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mythward_scan_files_added_total",
        "Total files discovered and inserted by scans",
    )
    .unwrap()
});

/// Metadata rows deleted by scans.
pub static SCAN_FILES_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "mythward_scan_files_deleted_total",
        "Total metadata rows deleted by scans",
    )
    .unwrap()
});

/// Sync runs total by result.
pub static SYNC_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mythward_sync_runs_total", "Total metadata sync runs"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Videos touched by syncs, by outcome.
pub static SYNC_VIDEOS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mythward_sync_videos_total", "Total videos seen by syncs"),
        &["outcome"], // "updated", "missing"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Upstream
        Box::new(UPSTREAM_REQUESTS.clone()),
        Box::new(UPSTREAM_REQUEST_DURATION.clone()),
        // Reconciliation
        Box::new(SCAN_RUNS.clone()),
        Box::new(SCAN_FILES_ADDED.clone()),
        Box::new(SCAN_FILES_DELETED.clone()),
        Box::new(SYNC_RUNS.clone()),
        Box::new(SYNC_VIDEOS.clone()),
    ]
}
