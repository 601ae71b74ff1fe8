//! Wire shapes for the DVR backend's Services API.
//!
//! One decode struct per upstream shape, field names as the backend spells
//! them. Several backend versions stringify scalars ("Id": "42"), so the
//! numeric and boolean fields decode from either form via the `de` helpers.

use serde::Deserialize;

/// Lenient scalar deserializers for backend versions that stringify values.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0)
                } else {
                    trimmed.parse().map_err(serde::de::Error::custom)
                }
            }
        }
    }

    pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0)
                } else {
                    trimmed.parse().map_err(serde::de::Error::custom)
                }
            }
        }
    }

    pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i32),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0)
                } else {
                    trimmed.parse().map_err(serde::de::Error::custom)
                }
            }
        }
    }

    /// Absent, empty, or unparseable values decode as `None`.
    pub fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Str(String),
        }
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => None,
            Some(Raw::Num(n)) => Some(n),
            Some(Raw::Str(s)) => s.trim().parse().ok(),
        })
    }

    /// Absent, empty, or unparseable values decode as `None`.
    pub fn lenient_opt_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f32),
            Str(String),
        }
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => None,
            Some(Raw::Num(n)) => Some(n),
            Some(Raw::Str(s)) => s.trim().parse().ok(),
        })
    }

    pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Num(i64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Num(n) => n != 0,
            Raw::Str(s) => matches!(s.trim(), "true" | "TRUE" | "True" | "1"),
        })
    }
}

/// One directory entry from `Myth/GetStorageGroupDirs`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct StorageGroupDir {
    #[serde(default)]
    pub HostName: String,
    #[serde(default)]
    pub DirName: String,
}

/// Video entry from `Video/GetVideoList` / `Video/GetVideo`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct VideoMetadataInfo {
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub Id: u32,
    #[serde(default)]
    pub Title: String,
    #[serde(default)]
    pub SubTitle: Option<String>,
    #[serde(default)]
    pub ReleaseDate: Option<String>,
    #[serde(default)]
    pub Description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_opt_f32")]
    pub UserRating: Option<f32>,
    #[serde(default)]
    pub Director: Option<String>,
    #[serde(default)]
    pub Coverart: Option<String>,
    #[serde(default)]
    pub Inetref: Option<String>,
    #[serde(default)]
    pub FileName: String,
    #[serde(default)]
    pub Cast: Option<CastMemberList>,
}

/// Cast container shared by video and program entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct CastMemberList {
    #[serde(default)]
    pub CastMembers: Vec<CastMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct CastMember {
    #[serde(default)]
    pub Name: String,
    #[serde(default)]
    pub Role: Option<String>,
}

/// Channel block inside a program entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct ChannelInfo {
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub ChanId: u32,
    #[serde(default)]
    pub ChanNum: String,
    #[serde(default)]
    pub CallSign: String,
    #[serde(default)]
    pub ChannelName: String,
    #[serde(default)]
    pub Icon: Option<String>,
}

/// Recording block inside a program entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct RecordingInfo {
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub RecordedId: u32,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub RecordId: u32,
    #[serde(default)]
    pub RecGroup: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub RecType: u32,
    #[serde(default)]
    pub StatusName: String,
    #[serde(default)]
    pub FileName: String,
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub FileSize: u64,
    #[serde(default)]
    pub StorageGroup: String,
}

/// Program entry from `Dvr/GetRecordedList` / `Dvr/GetRecorded` /
/// `Dvr/GetUpcomingList`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct Program {
    #[serde(default)]
    pub Channel: ChannelInfo,
    #[serde(default)]
    pub Title: String,
    #[serde(default)]
    pub SubTitle: Option<String>,
    #[serde(default)]
    pub StartTime: String,
    #[serde(default)]
    pub EndTime: String,
    #[serde(default)]
    pub Description: Option<String>,
    #[serde(default)]
    pub CatType: Option<String>,
    #[serde(default)]
    pub Category: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_opt_f32")]
    pub Stars: Option<f32>,
    #[serde(default)]
    pub Airdate: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_opt_u32")]
    pub Season: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_opt_u32")]
    pub Episode: Option<u32>,
    #[serde(default)]
    pub Cast: Option<CastMemberList>,
    #[serde(default)]
    pub Recording: Option<RecordingInfo>,
}

/// Recording rule from `Dvr/GetRecordSchedule`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct RecRule {
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub ChanId: u32,
    #[serde(default)]
    pub StartTime: String,
    #[serde(default)]
    pub EndTime: String,
    #[serde(default)]
    pub CallSign: String,
    #[serde(default)]
    pub Title: String,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub FindDay: i32,
    #[serde(default)]
    pub FindTime: String,
    #[serde(default)]
    pub Type: String,
}

/// One page of the upstream video list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPage {
    pub videos: Vec<VideoMetadataInfo>,
    pub total: u32,
}

/// One page of the upstream program list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramPage {
    pub programs: Vec<Program>,
    pub total: u32,
}

/// Parameter bundle for `Dvr/AddRecordSchedule`, carried over from the
/// rule the backend returned for the program.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePlan {
    pub chan_id: u32,
    pub start_time: String,
    pub end_time: String,
    pub station: String,
    pub type_name: String,
    pub title: String,
    pub find_day: i32,
    pub find_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_decodes_stringified_scalars() {
        let json = r#"{
            "Id": "42",
            "Title": "Alien",
            "SubTitle": "",
            "UserRating": "8.5",
            "FileName": "SciFi/Alien.mp4"
        }"#;
        let video: VideoMetadataInfo = serde_json::from_str(json).unwrap();
        assert_eq!(video.Id, 42);
        assert_eq!(video.Title, "Alien");
        assert_eq!(video.UserRating, Some(8.5));
        assert_eq!(video.FileName, "SciFi/Alien.mp4");
        assert!(video.Cast.is_none());
    }

    #[test]
    fn test_video_decodes_native_scalars() {
        let json = r#"{
            "Id": 7,
            "Title": "Alien",
            "UserRating": 9.0,
            "FileName": "SciFi/Alien.mp4",
            "Cast": {"CastMembers": [{"Name": "Sigourney Weaver", "Role": "ACTOR"}]}
        }"#;
        let video: VideoMetadataInfo = serde_json::from_str(json).unwrap();
        assert_eq!(video.Id, 7);
        assert_eq!(video.UserRating, Some(9.0));
        let cast = video.Cast.unwrap();
        assert_eq!(cast.CastMembers.len(), 1);
        assert_eq!(cast.CastMembers[0].Name, "Sigourney Weaver");
        assert_eq!(cast.CastMembers[0].Role.as_deref(), Some("ACTOR"));
    }

    #[test]
    fn test_program_decodes_with_recording_block() {
        let json = r#"{
            "Title": "News at Nine",
            "StartTime": "2024-06-15T21:00:00Z",
            "EndTime": "2024-06-15T22:00:00Z",
            "Category": "News",
            "CatType": "tvshow",
            "Stars": "0.8",
            "Channel": {"ChanId": "1021", "ChanNum": "10_2", "CallSign": "WNEWS", "ChannelName": "News 10"},
            "Recording": {
                "RecordedId": "311",
                "RecGroup": "Default",
                "StatusName": "Recorded",
                "FileName": "1021_20240615210000.ts",
                "FileSize": "2147483648",
                "StorageGroup": "Default"
            }
        }"#;
        let program: Program = serde_json::from_str(json).unwrap();
        assert_eq!(program.Channel.ChanId, 1021);
        assert_eq!(program.Stars, Some(0.8));
        let rec = program.Recording.unwrap();
        assert_eq!(rec.RecordedId, 311);
        assert_eq!(rec.FileSize, 2_147_483_648);
        assert_eq!(rec.StorageGroup, "Default");
    }

    #[test]
    fn test_program_decodes_with_everything_absent() {
        let program: Program = serde_json::from_str("{}").unwrap();
        assert_eq!(program.Title, "");
        assert!(program.Recording.is_none());
        assert_eq!(program.Channel.ChanId, 0);
    }

    #[test]
    fn test_lenient_opt_fields_treat_garbage_as_absent() {
        let json = r#"{"Title": "X", "Season": "not-a-number", "Episode": ""}"#;
        let program: Program = serde_json::from_str(json).unwrap();
        assert_eq!(program.Season, None);
        assert_eq!(program.Episode, None);
    }

    #[test]
    fn test_rec_rule_decodes() {
        let json = r#"{
            "ChanId": 1021,
            "StartTime": "2024-06-15T21:00:00Z",
            "EndTime": "2024-06-15T22:00:00Z",
            "CallSign": "WNEWS",
            "Title": "News at Nine",
            "FindDay": "0",
            "FindTime": "00:00:00",
            "Type": "Not Recording"
        }"#;
        let rule: RecRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.ChanId, 1021);
        assert_eq!(rule.FindDay, 0);
        assert_eq!(rule.CallSign, "WNEWS");
    }

    #[test]
    fn test_storage_group_dir_decodes() {
        let json = r#"{"HostName": "mythtv", "DirName": "/mnt/media/videos"}"#;
        let dir: StorageGroupDir = serde_json::from_str(json).unwrap();
        assert_eq!(dir.HostName, "mythtv");
        assert_eq!(dir.DirName, "/mnt/media/videos");
    }
}
