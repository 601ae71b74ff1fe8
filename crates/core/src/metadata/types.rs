//! Types for the video metadata store.

use thiserror::Error;

use crate::text::{path_hash, title_from_path};

/// Column order shared by the generated insert and update statements.
pub(crate) const FIELDS: [&str; 25] = [
    "host",
    "filename",
    "title",
    "hash",
    "contenttype",
    "year",
    "releasedate",
    "userrating",
    "inetref",
    "coverfile",
    "director",
    "subtitle",
    "collectionref",
    "homepage",
    "rating",
    "length",
    "playcount",
    "season",
    "episode",
    "showlevel",
    "childid",
    "browse",
    "watched",
    "processed",
    "category",
];

/// One row of the `videometadata` table.
///
/// Field names follow the table columns. `filename` is the path relative
/// to a Videos storage-group directory and identifies the row for updates.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRow {
    pub host: String,
    pub filename: String,
    pub title: String,
    pub hash: String,
    pub contenttype: String,
    pub year: u32,
    pub releasedate: String,
    pub userrating: f64,
    pub inetref: String,
    pub coverfile: String,
    pub director: String,
    pub subtitle: String,
    pub collectionref: i64,
    pub homepage: String,
    pub rating: String,
    pub length: i64,
    pub playcount: i64,
    pub season: i64,
    pub episode: i64,
    pub showlevel: i64,
    pub childid: i64,
    pub browse: i64,
    pub watched: i64,
    pub processed: i64,
    pub category: i64,
}

impl VideoRow {
    /// Baseline row for a file with no matched metadata: title and hash
    /// are derived from the path, everything else is the column default.
    /// Matched files get `MOVIE` and real metadata applied on top during
    /// sync; the `MUSICVIDEO` content type marks rows still waiting for a
    /// match.
    pub fn placeholder(host: &str, filename: &str) -> Self {
        Self {
            host: host.to_string(),
            filename: filename.to_string(),
            title: title_from_path(filename),
            hash: path_hash(filename),
            contenttype: "MUSICVIDEO".to_string(),
            year: 0,
            releasedate: "0000-00-00".to_string(),
            userrating: 0.0,
            inetref: "00000000".to_string(),
            coverfile: String::new(),
            director: String::new(),
            subtitle: String::new(),
            collectionref: -1,
            homepage: String::new(),
            rating: "NR".to_string(),
            length: 0,
            playcount: 0,
            season: 0,
            episode: 0,
            showlevel: 1,
            childid: -1,
            browse: 1,
            watched: 0,
            processed: 0,
            category: 0,
        }
    }

    /// Named parameters for the generated statements, in `FIELDS` order.
    pub(crate) fn params(&self) -> [(&'static str, &dyn rusqlite::ToSql); 25] {
        [
            (":host", &self.host),
            (":filename", &self.filename),
            (":title", &self.title),
            (":hash", &self.hash),
            (":contenttype", &self.contenttype),
            (":year", &self.year),
            (":releasedate", &self.releasedate),
            (":userrating", &self.userrating),
            (":inetref", &self.inetref),
            (":coverfile", &self.coverfile),
            (":director", &self.director),
            (":subtitle", &self.subtitle),
            (":collectionref", &self.collectionref),
            (":homepage", &self.homepage),
            (":rating", &self.rating),
            (":length", &self.length),
            (":playcount", &self.playcount),
            (":season", &self.season),
            (":episode", &self.episode),
            (":showlevel", &self.showlevel),
            (":childid", &self.childid),
            (":browse", &self.browse),
            (":watched", &self.watched),
            (":processed", &self.processed),
            (":category", &self.category),
        ]
    }
}

/// Errors for metadata store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_derives_title_and_hash() {
        let row = VideoRow::placeholder("mythtv", "SciFi/Alien.mp4");
        assert_eq!(row.host, "mythtv");
        assert_eq!(row.filename, "SciFi/Alien.mp4");
        assert_eq!(row.title, "Alien");
        assert_eq!(row.hash, format!("{:x}", md5::compute("SciFi/Alien.mp4")));
    }

    #[test]
    fn test_placeholder_column_defaults() {
        let row = VideoRow::placeholder("mythtv", "Drama/Heat.mp4");
        assert_eq!(row.contenttype, "MUSICVIDEO");
        assert_eq!(row.year, 0);
        assert_eq!(row.releasedate, "0000-00-00");
        assert_eq!(row.inetref, "00000000");
        assert_eq!(row.rating, "NR");
        assert_eq!(row.collectionref, -1);
        assert_eq!(row.childid, -1);
        assert_eq!(row.showlevel, 1);
        assert_eq!(row.browse, 1);
        assert_eq!(row.watched, 0);
    }

    #[test]
    fn test_params_cover_every_field() {
        let row = VideoRow::placeholder("mythtv", "a.mp4");
        let params = row.params();
        assert_eq!(params.len(), FIELDS.len());
        for (name, field) in params.iter().zip(FIELDS.iter()) {
            assert_eq!(name.0, &format!(":{}", field));
        }
    }
}
