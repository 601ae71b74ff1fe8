//! Testing utilities and mock implementations.
//!
//! This module provides a mock implementation of the upstream client trait,
//! allowing component and API testing without a real backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use mythward_core::testing::{fixtures, MockUpstream};
//!
//! let upstream = MockUpstream::new();
//! upstream.set_hostname("mythtv").await;
//! upstream
//!     .set_storage_dirs("Videos", vec![fixtures::storage_dir("mythtv", "/media/videos")])
//!     .await;
//!
//! // Use in VideoLibrary, Recordings, AppState...
//! ```

mod mock_upstream;

pub use mock_upstream::MockUpstream;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::upstream::{
        ChannelInfo, Program, RecRule, RecordingInfo, StorageGroupDir, VideoMetadataInfo,
    };

    /// Create a storage-group directory entry.
    pub fn storage_dir(host: &str, dir: &str) -> StorageGroupDir {
        StorageGroupDir {
            HostName: host.to_string(),
            DirName: dir.to_string(),
        }
    }

    /// Create an upstream video entry with just the identifying fields set.
    pub fn video_info(id: u32, title: &str, filename: &str) -> VideoMetadataInfo {
        VideoMetadataInfo {
            Id: id,
            Title: title.to_string(),
            FileName: filename.to_string(),
            ..Default::default()
        }
    }

    /// Create a channel block.
    pub fn channel(chan_id: u32, number: &str, callsign: &str) -> ChannelInfo {
        ChannelInfo {
            ChanId: chan_id,
            ChanNum: number.to_string(),
            CallSign: callsign.to_string(),
            ChannelName: format!("{} HD", callsign),
            Icon: None,
        }
    }

    /// Create a recorded program with a recording block and reasonable
    /// defaults.
    pub fn recorded_program(recid: u32, title: &str, start: &str, end: &str) -> Program {
        Program {
            Channel: channel(1021, "2_1", "WABC"),
            Title: title.to_string(),
            StartTime: start.to_string(),
            EndTime: end.to_string(),
            Category: Some("Movies".to_string()),
            Recording: Some(RecordingInfo {
                RecordedId: recid,
                RecGroup: Some("Default".to_string()),
                StatusName: "Recorded".to_string(),
                FileName: format!("{}.ts", recid),
                FileSize: 1024 * 1024 * 700,
                StorageGroup: "Default".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Create a recording rule for a program.
    pub fn rec_rule(chan_id: u32, title: &str, start: &str, end: &str) -> RecRule {
        RecRule {
            ChanId: chan_id,
            StartTime: start.to_string(),
            EndTime: end.to_string(),
            CallSign: "WABC".to_string(),
            Title: title.to_string(),
            FindDay: 0,
            FindTime: "00:00:00".to_string(),
            Type: "Not Recording".to_string(),
        }
    }
}
