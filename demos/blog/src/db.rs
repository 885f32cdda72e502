//! SQLite-backed post storage.
//!
//! A single blog has exactly one author (the `--handle` the process is
//! started with); posts are plain rows, oldest-first by `id`. Outbox paging
//! walks `id` downward from a cursor, newest-first, the same way the
//! dispatcher traits in `fedikit_core::federation` expect.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub published: DateTime<Utc>,
}

/// Guards the one `rusqlite::Connection` shared across async handlers.
/// `rusqlite` is synchronous and every call here blocks the calling task
/// for the duration of a query; a single-connection `Mutex` with no
/// `spawn_blocking` wrapping is accepted as fine for a worked example with
/// one SQLite file and no concurrent-load requirement.
pub struct Db(Mutex<Connection>);

impl Db {
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                content   TEXT NOT NULL,
                published TEXT NOT NULL
            )",
            (),
        )?;
        Ok(Db(Mutex::new(conn)))
    }

    pub fn insert(&self, content: &str) -> rusqlite::Result<Post> {
        let conn = self.0.lock().unwrap();
        let published = Utc::now();
        conn.execute(
            "INSERT INTO posts (content, published) VALUES (?1, ?2)",
            params![content, published.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Post { id, content: content.to_string(), published })
    }

    pub fn get(&self, id: i64) -> rusqlite::Result<Option<Post>> {
        let conn = self.0.lock().unwrap();
        conn.query_row("SELECT id, content, published FROM posts WHERE id = ?1", params![id], row_to_post)
            .optional()
    }

    /// All posts, newest first — used by the HTML index.
    pub fn recent(&self, limit: i64) -> rusqlite::Result<Vec<Post>> {
        let conn = self.0.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, content, published FROM posts ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![limit], row_to_post)?;
        rows.collect()
    }

    pub fn count(&self) -> rusqlite::Result<i64> {
        let conn = self.0.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM posts", (), |row| row.get(0))
    }

    pub fn first_id(&self) -> rusqlite::Result<Option<i64>> {
        let conn = self.0.lock().unwrap();
        conn.query_row("SELECT MAX(id) FROM posts", (), |row| row.get::<_, Option<i64>>(0))
    }

    pub fn last_id(&self) -> rusqlite::Result<Option<i64>> {
        let conn = self.0.lock().unwrap();
        conn.query_row("SELECT MIN(id) FROM posts", (), |row| row.get::<_, Option<i64>>(0))
    }

    /// A page of `PAGE_SIZE` posts at or before `before_id`, newest first,
    /// plus the cursor of the post immediately after this page (if any).
    pub fn page_before(&self, before_id: i64) -> rusqlite::Result<(Vec<Post>, Option<i64>)> {
        let conn = self.0.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, published FROM posts WHERE id <= ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let items: Vec<Post> = stmt.query_map(params![before_id, PAGE_SIZE], row_to_post)?.collect::<Result<_, _>>()?;
        let next_cursor = match items.last() {
            Some(oldest) if oldest.id > 1 => Some(oldest.id - 1),
            _ => None,
        };
        Ok((items, next_cursor))
    }
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let published: String = row.get(2)?;
    let published = DateTime::parse_from_rfc3339(&published)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    Ok(Post { id: row.get(0)?, content: row.get(1)?, published })
}
