//! Store Integration Tests
//!
//! File-backed SQLite store: persistence across reopen, month listing,
//! and ordering guarantees.

use tempfile::TempDir;

use soulscribe::domain::NewEntry;
use soulscribe::store::{JournalStore, SqliteStore, StoreError};

#[tokio::test]
async fn test_entries_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("vault").join("journal.db");

    let id = {
        let store = SqliteStore::open(&db).unwrap();
        let saved = store
            .create(NewEntry::plain("u1", "write it down"))
            .await
            .unwrap();
        saved.id
    };

    let store = SqliteStore::open(&db).unwrap();
    let fetched = store.get(id).await.unwrap();
    assert_eq!(fetched.content, "write it down");
    assert_eq!(fetched.user_id, "u1");
}

#[tokio::test]
async fn test_list_by_month_scopes_and_orders() {
    let temp = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp.path().join("journal.db")).unwrap();

    store
        .insert_backdated(NewEntry::plain("u1", "july"), "2026-07-15T12:00:00.000Z")
        .await
        .unwrap();
    store
        .insert_backdated(NewEntry::plain("u1", "early august"), "2026-08-03T12:00:00.000Z")
        .await
        .unwrap();
    store
        .insert_backdated(NewEntry::plain("u1", "late august"), "2026-08-20T12:00:00.000Z")
        .await
        .unwrap();
    store
        .insert_backdated(NewEntry::plain("u2", "someone else"), "2026-08-10T12:00:00.000Z")
        .await
        .unwrap();

    let entries = store.list_by_month("u1", 2026, 8).await.unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first
    assert_eq!(entries[0].content, "late august");
    assert_eq!(entries[1].content, "early august");
}

#[tokio::test]
async fn test_month_with_no_entries_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp.path().join("journal.db")).unwrap();

    let entries = store.list_by_month("u1", 2026, 1).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_update_missing_entry_is_not_found() {
    let temp = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp.path().join("journal.db")).unwrap();

    let err = store
        .update_content(uuid::Uuid::new_v4(), "new text")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_edit_rejects_empty_content() {
    let temp = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp.path().join("journal.db")).unwrap();

    let saved = store
        .create(NewEntry::plain("u1", "keep me"))
        .await
        .unwrap();
    let err = store.update_content(saved.id, "  ").await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyContent));

    // Original content untouched.
    assert_eq!(store.get(saved.id).await.unwrap().content, "keep me");
}
