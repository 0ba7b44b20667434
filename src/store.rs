//! SQLite-backed entry storage.
//!
//! All access goes through one `tokio_rusqlite::Connection`, which runs
//! statements on its own thread in call order. Every mutation is a single
//! autocommitted statement.

use std::path::Path;

use rusqlite::{Row, params};
use tokio_rusqlite::Connection;

use crate::entry::{Entry, NewEntry};
use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    text TEXT NOT NULL
);
"#;

pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    /// Opens (creating if needed) the database file and its schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    /// Inserts an entry and returns its new id.
    pub async fn insert(&self, entry: NewEntry) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO entries (title, text) VALUES (?1, ?2)",
                    params![entry.title, entry.text],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Deletes the entry with `id`. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .call(move |conn| Ok(conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?))
            .await?;
        Ok(removed > 0)
    }

    /// Every entry in insertion order.
    pub async fn all(&self) -> Result<Vec<Entry>> {
        let entries = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, title, text FROM entries ORDER BY id")?;
                let entries = stmt
                    .query_map([], entry_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await?;
        Ok(entries)
    }

    /// Entries whose title or text contains `query`, ignoring ASCII case.
    ///
    /// `instr` matches the query literally, so `%` and `_` carry no
    /// wildcard meaning.
    pub async fn search(&self, query: &str) -> Result<Vec<Entry>> {
        let query = query.to_owned();
        let entries = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, text FROM entries
                       WHERE instr(lower(title), lower(?1)) > 0
                          OR instr(lower(text), lower(?1)) > 0
                       ORDER BY id"#,
                )?;
                let entries = stmt
                    .query_map(params![query], entry_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await?;
        Ok(entries)
    }

    pub async fn count(&self) -> Result<usize> {
        let count = self
            .conn
            .call(|conn| {
                let n: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
                Ok(n)
            })
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Round-trips a trivial query; used by the readiness probe.
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
    })
}
