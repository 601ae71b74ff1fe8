//! SQLite-backed video metadata store implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rusqlite::{params, Connection};

use super::{MetadataStore, StoreError, VideoRow};
use super::types::FIELDS;

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let placeholders: Vec<String> = FIELDS.iter().map(|field| format!(":{}", field)).collect();
    format!(
        "INSERT INTO videometadata ({}) VALUES ({})",
        FIELDS.join(", "),
        placeholders.join(", ")
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let assignments: Vec<String> = FIELDS
        .iter()
        .map(|field| format!("{} = :{}", field, field))
        .collect();
    format!(
        "UPDATE videometadata SET {} WHERE filename = :filename",
        assignments.join(", ")
    )
});

static SELECT_BY_FILENAME_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT {} FROM videometadata WHERE filename = ?",
        FIELDS.join(", ")
    )
});

/// SQLite-backed video metadata store.
pub struct SqliteMetadataStore {
    conn: Mutex<Connection>,
}

impl SqliteMetadataStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Video library rows (one per file, keyed by relative path)
            CREATE TABLE IF NOT EXISTS videometadata (
                intid INTEGER PRIMARY KEY AUTOINCREMENT,
                host TEXT NOT NULL,
                filename TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                hash TEXT NOT NULL,
                contenttype TEXT NOT NULL,
                year INTEGER NOT NULL DEFAULT 0,
                releasedate TEXT NOT NULL DEFAULT '0000-00-00',
                userrating REAL NOT NULL DEFAULT 0,
                inetref TEXT NOT NULL DEFAULT '00000000',
                coverfile TEXT NOT NULL DEFAULT '',
                director TEXT NOT NULL DEFAULT '',
                subtitle TEXT NOT NULL DEFAULT '',
                collectionref INTEGER NOT NULL DEFAULT -1,
                homepage TEXT NOT NULL DEFAULT '',
                rating TEXT NOT NULL DEFAULT 'NR',
                length INTEGER NOT NULL DEFAULT 0,
                playcount INTEGER NOT NULL DEFAULT 0,
                season INTEGER NOT NULL DEFAULT 0,
                episode INTEGER NOT NULL DEFAULT 0,
                showlevel INTEGER NOT NULL DEFAULT 1,
                childid INTEGER NOT NULL DEFAULT -1,
                browse INTEGER NOT NULL DEFAULT 1,
                watched INTEGER NOT NULL DEFAULT 0,
                processed INTEGER NOT NULL DEFAULT 0,
                category INTEGER NOT NULL DEFAULT 0
            );

            -- Cast names, deduplicated
            CREATE TABLE IF NOT EXISTS videocast (
                intid INTEGER PRIMARY KEY AUTOINCREMENT,
                "cast" TEXT NOT NULL UNIQUE
            );

            -- Video to cast links
            CREATE TABLE IF NOT EXISTS videometadatacast (
                idvideo INTEGER NOT NULL,
                idcast INTEGER NOT NULL,
                UNIQUE(idvideo, idcast)
            );

            CREATE INDEX IF NOT EXISTS idx_videometadatacast_video ON videometadatacast(idvideo);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Row id for a video file path, if a row exists.
    pub fn video_id(&self, filename: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT intid FROM videometadata WHERE filename = ?",
            params![filename],
            |row| row.get(0),
        ) {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    /// Load one row by relative file path.
    pub fn video_row(&self, filename: &str) -> Result<Option<VideoRow>, StoreError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            &SELECT_BY_FILENAME_SQL,
            params![filename],
            Self::row_to_video_row,
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    /// Names of cast members linked to a video row.
    pub fn cast_for_video(&self, video_id: i64) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"SELECT vc."cast" FROM videocast vc
                   JOIN videometadatacast vmc ON vmc.idcast = vc.intid
                   WHERE vmc.idvideo = ? ORDER BY vc."cast""#,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![video_id], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(names)
    }

    /// Convert a row selected in `FIELDS` order.
    fn row_to_video_row(row: &rusqlite::Row) -> rusqlite::Result<VideoRow> {
        Ok(VideoRow {
            host: row.get(0)?,
            filename: row.get(1)?,
            title: row.get(2)?,
            hash: row.get(3)?,
            contenttype: row.get(4)?,
            year: row.get(5)?,
            releasedate: row.get(6)?,
            userrating: row.get(7)?,
            inetref: row.get(8)?,
            coverfile: row.get(9)?,
            director: row.get(10)?,
            subtitle: row.get(11)?,
            collectionref: row.get(12)?,
            homepage: row.get(13)?,
            rating: row.get(14)?,
            length: row.get(15)?,
            playcount: row.get(16)?,
            season: row.get(17)?,
            episode: row.get(18)?,
            showlevel: row.get(19)?,
            childid: row.get(20)?,
            browse: row.get(21)?,
            watched: row.get(22)?,
            processed: row.get(23)?,
            category: row.get(24)?,
        })
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn filepaths(&self) -> Result<HashMap<String, i64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT filename, intid FROM videometadata")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut files = HashMap::new();
        for row in rows {
            let (filename, id) = row.map_err(|e| StoreError::Database(e.to_string()))?;
            files.insert(filename, id);
        }
        Ok(files)
    }

    fn insert_video(&self, row: &VideoRow) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(&INSERT_SQL, &row.params()[..])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn update_video(&self, row: &VideoRow) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(&UPDATE_SQL, &row.params()[..])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    fn delete_by_filepath(&self, filename: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM videometadatacast WHERE idvideo IN
             (SELECT intid FROM videometadata WHERE filename = ?)",
            params![filename],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        conn.execute(
            "DELETE FROM videometadata WHERE filename = ?",
            params![filename],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM videometadatacast", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let removed = conn
            .execute("DELETE FROM videometadata", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        conn.execute("DELETE FROM videocast", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(removed)
    }

    fn ensure_cast(&self, name: &str) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            r#"SELECT intid FROM videocast WHERE "cast" = ?"#,
            params![name],
            |row| row.get(0),
        ) {
            Ok(id) => return Ok(id),
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(StoreError::Database(e.to_string())),
        }
        conn.execute(r#"INSERT INTO videocast ("cast") VALUES (?)"#, params![name])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn link_cast(&self, video_id: i64, cast_id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO videometadatacast (idvideo, idcast) VALUES (?, ?)",
            params![video_id, cast_id],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteMetadataStore {
        SqliteMetadataStore::in_memory().unwrap()
    }

    #[test]
    fn test_generated_statements() {
        assert!(INSERT_SQL.starts_with("INSERT INTO videometadata (host, filename, title,"));
        assert_eq!(INSERT_SQL.matches(':').count(), 25);
        assert!(UPDATE_SQL.starts_with("UPDATE videometadata SET host = :host,"));
        assert!(UPDATE_SQL.ends_with("WHERE filename = :filename"));
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = create_test_store();
        let row = VideoRow::placeholder("mythtv", "SciFi/Alien.mp4");

        let id = store.insert_video(&row).unwrap();
        assert!(id > 0);

        assert_eq!(store.video_id("SciFi/Alien.mp4").unwrap(), Some(id));
        assert_eq!(store.video_id("SciFi/Aliens.mp4").unwrap(), None);

        let loaded = store.video_row("SciFi/Alien.mp4").unwrap().unwrap();
        assert_eq!(loaded, row);
    }

    #[test]
    fn test_filepaths() {
        let store = create_test_store();
        store
            .insert_video(&VideoRow::placeholder("mythtv", "a.mp4"))
            .unwrap();
        store
            .insert_video(&VideoRow::placeholder("mythtv", "Drama/b.mkv"))
            .unwrap();

        let files = store.filepaths().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files.get("a.mp4").copied(), store.video_id("a.mp4").unwrap());
        assert!(files.contains_key("Drama/b.mkv"));
    }

    #[test]
    fn test_update_existing_row() {
        let store = create_test_store();
        let mut row = VideoRow::placeholder("mythtv", "Drama/Heat.mp4");
        store.insert_video(&row).unwrap();

        row.contenttype = "MOVIE".to_string();
        row.year = 1995;
        row.releasedate = "1995-01-01".to_string();
        row.director = "Michael Mann".to_string();

        assert!(store.update_video(&row).unwrap());

        let loaded = store.video_row("Drama/Heat.mp4").unwrap().unwrap();
        assert_eq!(loaded.contenttype, "MOVIE");
        assert_eq!(loaded.year, 1995);
        assert_eq!(loaded.director, "Michael Mann");
    }

    #[test]
    fn test_update_missing_row_is_false() {
        let store = create_test_store();
        let row = VideoRow::placeholder("mythtv", "nope.mp4");
        assert!(!store.update_video(&row).unwrap());
    }

    #[test]
    fn test_filename_with_quotes_is_bound() {
        let store = create_test_store();
        let filename = "Action/O'Brien's \"War\".mp4";
        let row = VideoRow::placeholder("mythtv", filename);

        let id = store.insert_video(&row).unwrap();
        assert_eq!(store.video_id(filename).unwrap(), Some(id));
        assert!(store.update_video(&row).unwrap());
        store.delete_by_filepath(filename).unwrap();
        assert_eq!(store.video_id(filename).unwrap(), None);
    }

    #[test]
    fn test_delete_by_filepath_removes_links() {
        let store = create_test_store();
        let id = store
            .insert_video(&VideoRow::placeholder("mythtv", "Drama/Heat.mp4"))
            .unwrap();
        let cast_id = store.ensure_cast("Al Pacino").unwrap();
        store.link_cast(id, cast_id).unwrap();

        store.delete_by_filepath("Drama/Heat.mp4").unwrap();

        assert_eq!(store.video_id("Drama/Heat.mp4").unwrap(), None);
        assert!(store.cast_for_video(id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_all_counts_video_rows() {
        let store = create_test_store();
        let id = store
            .insert_video(&VideoRow::placeholder("mythtv", "a.mp4"))
            .unwrap();
        store
            .insert_video(&VideoRow::placeholder("mythtv", "b.mp4"))
            .unwrap();
        let cast_id = store.ensure_cast("Sigourney Weaver").unwrap();
        store.link_cast(id, cast_id).unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.filepaths().unwrap().is_empty());
        assert!(store.cast_for_video(id).unwrap().is_empty());
        // Cast table was cleared too, so the next ensure allocates a new id
        let new_cast_id = store.ensure_cast("Sigourney Weaver").unwrap();
        assert_ne!(new_cast_id, cast_id);
    }

    #[test]
    fn test_ensure_cast_is_idempotent() {
        let store = create_test_store();
        let first = store.ensure_cast("Harrison Ford").unwrap();
        let second = store.ensure_cast("Harrison Ford").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_link_cast_is_idempotent() {
        let store = create_test_store();
        let id = store
            .insert_video(&VideoRow::placeholder("mythtv", "a.mp4"))
            .unwrap();
        let cast_id = store.ensure_cast("Carrie Fisher").unwrap();

        store.link_cast(id, cast_id).unwrap();
        store.link_cast(id, cast_id).unwrap();

        assert_eq!(store.cast_for_video(id).unwrap(), vec!["Carrie Fisher"]);
    }

    #[test]
    fn test_duplicate_filename_insert_fails() {
        let store = create_test_store();
        let row = VideoRow::placeholder("mythtv", "a.mp4");
        store.insert_video(&row).unwrap();
        assert!(matches!(
            store.insert_video(&row),
            Err(StoreError::Database(_))
        ));
    }
}
