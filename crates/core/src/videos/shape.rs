//! Shaping between the upstream video wire format and the client model.
//!
//! The backend stringifies, pads, and placeholder-fills a number of fields
//! (`Unknown` directors, `00000000` inetrefs, the literal text `None` as a
//! description). Conversion strips those so clients only see real values.

use chrono::Datelike;

use crate::upstream::VideoMetadataInfo;

use super::types::{Credit, Video, WebRef};

/// Convert an upstream video entry into the client model.
pub fn video_from_upstream(info: VideoMetadataInfo) -> Video {
    let mut credits: Vec<Credit> = Vec::new();
    if let Some(director) = info.Director.as_deref() {
        if !director.is_empty() && director != "Unknown" {
            credits.push(Credit::director(director));
        }
    }
    if let Some(cast) = &info.Cast {
        for member in &cast.CastMembers {
            if member.Role.as_deref() == Some("ACTOR") && !member.Name.is_empty() {
                credits.push(Credit::actor(&member.Name));
            }
        }
    }

    Video {
        id: Some(info.Id),
        title: info.Title,
        category: None,
        file: info.FileName,
        subtitle: info.SubTitle.filter(|s| !s.is_empty()),
        year: info.ReleaseDate.as_deref().and_then(year_from_release_date),
        description: info
            .Description
            .filter(|d| !d.is_empty() && d != "None"),
        rating: info.UserRating.filter(|r| *r != 0.0).map(|r| r / 2.0),
        credits: if credits.is_empty() { None } else { Some(credits) },
        poster: info
            .Coverart
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(poster_name),
        webref: info
            .Inetref
            .filter(|r| !r.is_empty() && r != "00000000")
            .map(|reference| WebRef {
                site: "imdb.com".to_string(),
                reference,
            }),
        medium: None,
    }
}

/// Parameters for `Video/UpdateVideoMetadata`, in the order the backend
/// documents them. Only fields the video actually carries are sent.
pub fn video_update_params(
    id: u32,
    video: &Video,
    coverfile: Option<String>,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("Id".to_string(), id.to_string()),
        ("Title".to_string(), video.title.clone()),
    ];

    if let Some(subtitle) = &video.subtitle {
        params.push(("SubTitle".to_string(), subtitle.clone()));
    }
    if let Some(year) = video.year.filter(|year| *year > 0) {
        params.push((
            "ReleaseDate".to_string(),
            format!("{}-01-01T00:00:00Z", year),
        ));
        params.push(("Year".to_string(), year.to_string()));
    }
    if let Some(description) = &video.description {
        params.push(("Plot".to_string(), description.clone()));
    }
    if let Some(rating) = video.rating {
        // Client ratings are 0-5, the backend stores 0-10
        params.push(("UserRating".to_string(), ((rating * 2.0) as i32).to_string()));
    }

    let credits = video.credits.as_deref().unwrap_or_default();
    let actors: Vec<&str> = credits
        .iter()
        .filter(|c| c.role == "actor")
        .map(|c| c.name.as_str())
        .collect();
    if !actors.is_empty() {
        params.push(("Cast".to_string(), actors.join(",")));
    }
    let directors: Vec<&str> = credits
        .iter()
        .filter(|c| c.role == "director")
        .map(|c| c.name.as_str())
        .collect();
    if !directors.is_empty() {
        params.push(("Director".to_string(), directors.join(", ")));
    }

    if let Some(coverfile) = coverfile {
        params.push(("Coverart".to_string(), coverfile.clone()));
        params.push(("CoverFile".to_string(), coverfile));
    }
    if let Some(webref) = &video.webref {
        params.push(("Inetref".to_string(), webref.reference.clone()));
    }

    params
}

/// Year of a release date that may be a full timestamp, a plain date, or
/// the backend's `0000-00-00` filler.
fn year_from_release_date(date: &str) -> Option<u32> {
    if date.is_empty() {
        return None;
    }
    chrono::DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.year() as u32)
        .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
        .filter(|year| *year > 0)
}

/// Poster file name without the storage directory part.
fn poster_name(coverart: &str) -> String {
    match coverart.rfind('/') {
        Some(idx) => coverart[idx + 1..].to_string(),
        None => coverart.to_string(),
    }
}
