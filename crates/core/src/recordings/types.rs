//! Canonical recording entities served to API clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::videos::Credit;

/// Channel icon reference, with the shade token the frontend uses to pick
/// a background (second `_`-separated segment of the icon file name).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelIcon {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<String>,
}

/// Broadcast channel a program was recorded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u32,
    /// Display channel number, e.g. `"7_1"`. Kept as text because
    /// subchannel separators vary between backends.
    pub number: String,
    pub callsign: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ChannelIcon>,
}

/// A recorded program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub channel: Channel,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Program kind as reported by the backend guide data, e.g. `"movie"`
    /// or `"series"`. Empty when the backend does not classify it.
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    /// Star rating on a 0 to 5 scale; 0 when unrated.
    pub rating: f32,
    pub recid: u32,
    pub status: String,
    pub file: String,
    pub size: u64,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default)]
    pub credits: Vec<Credit>,
}

/// Listing payload for the recordings endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingsResponse {
    pub recordings: Vec<Recording>,
    /// Total recordings the backend reports, before paging.
    pub total: u32,
}

/// One entry in the scheduled-recordings index, keyed by channel and
/// start time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRecording {
    /// Record rule id assigned by the backend.
    pub id: u32,
    pub channel_id: u32,
    pub start: DateTime<Utc>,
    /// Numeric record type (see [`RecordingType`]).
    #[serde(rename = "type")]
    pub kind: u32,
    pub status: String,
}

/// Request body for scheduling a program to record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub channel_id: u32,
    pub start: DateTime<Utc>,
    /// Numeric record type id (see [`RecordingType`]).
    #[serde(rename = "type")]
    pub kind: u32,
}

/// Record rule kinds the backend accepts, by their numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingType {
    Single,
    Daily,
    All,
    Weekly,
    One,
}

impl RecordingType {
    /// Map a numeric record type id to a kind. Ids 0, 3 and anything
    /// above 6 have no schedulable kind.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Single),
            2 => Some(Self::Daily),
            4 => Some(Self::All),
            5 => Some(Self::Weekly),
            6 => Some(Self::One),
            _ => None,
        }
    }

    /// The type name the backend's add-schedule call expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "Single Record",
            Self::Daily => "Record Daily",
            Self::All => "Record All",
            Self::Weekly => "Record Weekly",
            Self::One => "Record One",
        }
    }
}
