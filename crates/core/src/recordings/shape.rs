//! Conversions from the backend's program shapes to canonical recordings.

use chrono::{DateTime, Utc};

use crate::upstream::{ChannelInfo, Program};
use crate::videos::Credit;

use super::types::{Channel, ChannelIcon, Recording, ScheduledRecording};

/// Shape one recorded program into the canonical recording entity.
///
/// The backend reports star ratings as a 0..1 fraction; clients get the
/// 0..5 scale. The year comes from the airdate only when it leads with a
/// four-digit year, and an episode number is meaningless without a season.
pub fn recording_from_program(program: Program) -> Recording {
    let info = program.Recording.unwrap_or_default();
    let season = program.Season.filter(|season| *season > 0);
    let episode = match season {
        Some(_) => program.Episode.filter(|episode| *episode > 0),
        None => None,
    };
    let credits = program
        .Cast
        .map(|cast| {
            cast.CastMembers
                .into_iter()
                .map(|member| Credit {
                    name: member.Name,
                    role: member.Role.unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Recording {
        channel: channel_from_info(program.Channel),
        title: program.Title,
        subtitle: program.SubTitle.filter(|subtitle| !subtitle.is_empty()),
        start: parse_time(&program.StartTime),
        end: parse_time(&program.EndTime),
        description: program
            .Description
            .filter(|description| !description.is_empty()),
        kind: program.CatType.unwrap_or_default(),
        category: program.Category.unwrap_or_default(),
        rating: program.Stars.map(|stars| stars * 5.0).unwrap_or(0.0),
        recid: info.RecordedId,
        status: info.StatusName,
        file: info.FileName,
        size: info.FileSize,
        group: info.StorageGroup,
        year: program.Airdate.as_deref().and_then(airdate_year),
        season,
        episode,
        credits,
    }
}

/// Shape one upcoming program into a scheduled-recordings index entry.
pub fn scheduled_from_program(program: Program) -> ScheduledRecording {
    let info = program.Recording.unwrap_or_default();
    ScheduledRecording {
        id: info.RecordId,
        channel_id: program.Channel.ChanId,
        start: parse_time(&program.StartTime),
        kind: info.RecType,
        status: info.StatusName,
    }
}

fn channel_from_info(info: ChannelInfo) -> Channel {
    let icon = info
        .Icon
        .filter(|icon| !icon.is_empty())
        .map(|file| ChannelIcon {
            shade: file.split('_').nth(1).map(str::to_string),
            file,
        });

    Channel {
        id: info.ChanId,
        number: info.ChanNum,
        callsign: info.CallSign,
        name: info.ChannelName,
        icon,
    }
}

pub(super) fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .unwrap_or_default()
}

fn airdate_year(airdate: &str) -> Option<u32> {
    if airdate.find('-') != Some(4) {
        return None;
    }
    airdate[..4].parse().ok()
}
