//! SQLite-backed journal store.
//!
//! Entries and profiles live in two tables keyed by user. `created_at`
//! is TEXT in the canonical ISO-8601 format, so range queries are plain
//! string comparisons.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{month_bounds, JournalStore, StoreError};
use crate::domain::entry::now_timestamp;
use crate::domain::{JournalEntry, NewEntry, UserProfile};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS journals (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    content     TEXT NOT NULL,
    mood        TEXT NOT NULL DEFAULT '',
    mood_score  REAL NOT NULL DEFAULT 0,
    sentiment   TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_journals_user_created
    ON journals (user_id, created_at);

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(unavailable)?;
        }
        let conn = Connection::open(path).map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert an entry with an explicit timestamp. Used for imports and
    /// test fixtures; normal creation goes through [`JournalStore::create`].
    pub async fn insert_backdated(
        &self,
        entry: NewEntry,
        created_at: &str,
    ) -> Result<JournalEntry, StoreError> {
        if entry.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let id = Uuid::new_v4();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO journals (id, user_id, content, mood, mood_score, sentiment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                entry.user_id,
                entry.content,
                entry.mood,
                entry.mood_score,
                entry.sentiment,
                created_at,
            ],
        )
        .map_err(unavailable)?;

        Ok(JournalEntry {
            id,
            user_id: entry.user_id,
            content: entry.content,
            mood: entry.mood,
            mood_score: entry.mood_score,
            sentiment: entry.sentiment,
            created_at: created_at.to_string(),
        })
    }
}

fn unavailable(e: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalEntry> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(JournalEntry {
        id,
        user_id: row.get(1)?,
        content: row.get(2)?,
        mood: row.get(3)?,
        mood_score: row.get(4)?,
        sentiment: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const ENTRY_COLUMNS: &str = "id, user_id, content, mood, mood_score, sentiment, created_at";

#[async_trait]
impl JournalStore for SqliteStore {
    async fn create(&self, entry: NewEntry) -> Result<JournalEntry, StoreError> {
        let created_at = now_timestamp();
        self.insert_backdated(entry, &created_at).await
    }

    async fn get(&self, id: Uuid) -> Result<JournalEntry, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM journals WHERE id = ?1"),
            params![id.to_string()],
            row_to_entry,
        )
        .optional()
        .map_err(unavailable)?
        .ok_or(StoreError::NotFound(id))
    }

    async fn list_by_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| StoreError::Unavailable(format!("invalid month {year}-{month}")))?;
        self.list_by_date_range(user_id, &start, &end).await
    }

    async fn list_by_date_range(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM journals
                 WHERE user_id = ?1 AND created_at >= ?2 AND created_at <= ?3
                 ORDER BY created_at DESC"
            ))
            .map_err(unavailable)?;

        let rows = stmt
            .query_map(params![user_id, start, end], row_to_entry)
            .map_err(unavailable)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(unavailable)
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<(), StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE journals SET content = ?1 WHERE id = ?2",
                params![content, id.to_string()],
            )
            .map_err(unavailable)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute("DELETE FROM journals WHERE id = ?1", params![id.to_string()])
            .map_err(unavailable)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (user_id, first_name, last_name, email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 email = excluded.email",
            params![
                user_id,
                profile.first_name,
                profile.last_name,
                profile.email,
                profile.created_at,
            ],
        )
        .map_err(unavailable)?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT first_name, last_name, email, created_at FROM users WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserProfile {
                    first_name: row.get(0)?,
                    last_name: row.get(1)?,
                    email: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(unavailable)
    }
}
