//! Recorded programs: listing, lookup, deletion, and the record-schedule
//! workflow against the DVR backend.

mod data;
mod shape;
mod types;

pub use data::Recordings;
pub use types::{
    Channel, ChannelIcon, Recording, RecordingType, RecordingsResponse, ScheduleRequest,
    ScheduledRecording,
};
