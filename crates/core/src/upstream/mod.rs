//! Backend Services API: client, trait, and wire types.

mod error;
mod myth;
mod traits;
mod types;

pub use error::UpstreamError;
pub use myth::MythApiClient;
pub use traits::UpstreamClient;
pub use types::{
    CastMember, CastMemberList, ChannelInfo, Program, ProgramPage, RecRule, RecordingInfo,
    SchedulePlan, StorageGroupDir, VideoMetadataInfo, VideoPage,
};
