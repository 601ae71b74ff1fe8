//! Client-facing video library types.

use serde::{Deserialize, Serialize};

/// A video library entry as clients see it.
///
/// `file` is the path relative to a Videos storage-group directory.
/// `category` and `medium` are client-side attributes: the backend does
/// not carry them, clients send them along when asking for a sync or an
/// update. A `medium` of `DVD` marks a disc rip that has no single file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Star rating on a 0 to 5 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Vec<Credit>>,
    /// Poster file name without any directory part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webref: Option<WebRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

/// A credited person. `role` is `actor` or `director`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub name: String,
    pub role: String,
}

impl Credit {
    pub fn actor(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: "actor".to_string(),
        }
    }

    pub fn director(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: "director".to_string(),
        }
    }
}

/// An external metadata reference, e.g. `imdb.com` / `tt0078748`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebRef {
    pub site: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

/// One page of the video listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideosResponse {
    pub videos: Vec<Video>,
    /// Library size before paging was applied.
    pub total: u32,
}

/// Result of a library scan: relative paths added to and removed from the
/// metadata rows, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

/// Result of a metadata sync: titles whose rows were updated and entries
/// that could not be matched, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub updated: Vec<String>,
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_serialization_skips_absent_fields() {
        let video = Video {
            title: "Alien".to_string(),
            file: "SciFi/Alien.mp4".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["title"], "Alien");
        assert_eq!(json["file"], "SciFi/Alien.mp4");
        assert!(json.get("id").is_none());
        assert!(json.get("rating").is_none());
        assert!(json.get("credits").is_none());
    }

    #[test]
    fn test_webref_serializes_ref_key() {
        let webref = WebRef {
            site: "imdb.com".to_string(),
            reference: "tt0078748".to_string(),
        };
        let json = serde_json::to_value(&webref).unwrap();
        assert_eq!(json["ref"], "tt0078748");

        let parsed: WebRef =
            serde_json::from_str(r#"{"site": "imdb.com", "ref": "tt0078748"}"#).unwrap();
        assert_eq!(parsed, webref);
    }

    #[test]
    fn test_video_deserializes_with_minimal_fields() {
        let video: Video =
            serde_json::from_str(r#"{"title": "Heat", "file": "Drama/Heat.mp4"}"#).unwrap();
        assert_eq!(video.title, "Heat");
        assert_eq!(video.id, None);
        assert_eq!(video.medium, None);
    }

    #[test]
    fn test_video_deserializes_full_entry() {
        let json = r#"{
            "id": 12,
            "title": "Alien",
            "category": "SciFi",
            "file": "SciFi/Alien.mp4",
            "year": 1979,
            "rating": 4.5,
            "credits": [
                {"name": "Ridley Scott", "role": "director"},
                {"name": "Sigourney Weaver", "role": "actor"}
            ],
            "poster": "alien.jpg",
            "webref": {"site": "imdb.com", "ref": "tt0078748"},
            "medium": "mp4"
        }"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.id, Some(12));
        assert_eq!(video.year, Some(1979));
        assert_eq!(video.credits.as_ref().unwrap().len(), 2);
        assert_eq!(video.credits.as_ref().unwrap()[0], Credit::director("Ridley Scott"));
        assert_eq!(video.webref.as_ref().unwrap().reference, "tt0078748");
    }
}
