//! Journal and profile persistence.
//!
//! The [`JournalStore`] trait is the seam a remote document store would
//! plug into; the bundled backend is SQLite.

pub mod sqlite;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use thiserror::Error;
use uuid::Uuid;

pub use sqlite::SqliteStore;

use crate::domain::entry::format_timestamp;
use crate::domain::{JournalEntry, NewEntry, UserProfile};

/// Errors from the persistence layer. Callers surface these without
/// discarding in-progress user text, so a retry stays possible.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Journal store unavailable: {0}")]
    Unavailable(String),

    #[error("Entry not found: {0}")]
    NotFound(Uuid),

    #[error("Entry content must not be empty")]
    EmptyContent,
}

/// Per-user journal document store.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Insert a new entry; the store assigns the id and stamps
    /// `created_at` once.
    async fn create(&self, entry: NewEntry) -> Result<JournalEntry, StoreError>;

    async fn get(&self, id: Uuid) -> Result<JournalEntry, StoreError>;

    /// All of a user's entries within the given calendar month (local
    /// time), newest first.
    async fn list_by_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// All of a user's entries with `created_at` in the inclusive range,
    /// newest first. Bounds are canonical timestamp strings.
    async fn list_by_date_range(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Replace `content` only; every other field stays untouched.
    async fn update_content(&self, id: Uuid, content: &str) -> Result<(), StoreError>;

    /// Remove the entry permanently. The caller layer is responsible for
    /// explicit user confirmation.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;
}

/// Inclusive timestamp bounds for a local calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    }
    .pred_opt()?;

    Some((day_start(first), day_end(last)))
}

/// Canonical timestamp for a local day's midnight.
pub fn day_start(date: NaiveDate) -> String {
    let local = Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    format_timestamp(local.with_timezone(&chrono::Utc))
}

/// Canonical timestamp for a local day's last instant (23:59:59.999).
pub fn day_end(date: NaiveDate) -> String {
    let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time");
    let local = Local
        .from_local_datetime(&date.and_time(t))
        .latest()
        .unwrap_or_else(|| Local.from_utc_datetime(&date.and_time(t)));
    format_timestamp(local.with_timezone(&chrono::Utc))
}
