//! Insights Integration Tests
//!
//! Streak and weekly feels computed over a real SQLite store. Fixture
//! timestamps are anchored to local wall-clock time so the local-day
//! bucketing behaves the same in any timezone.

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use soulscribe::domain::entry::format_timestamp;
use soulscribe::domain::NewEntry;
use soulscribe::insights::{current_streak, weekly_feels};
use soulscribe::store::SqliteStore;

fn ts_on(date: NaiveDate, hour: u32) -> String {
    let local = Local
        .from_local_datetime(&date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()))
        .single()
        .unwrap();
    format_timestamp(local.with_timezone(&Utc))
}

async fn store_with_days(user: &str, days: &[NaiveDate]) -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    for day in days {
        store
            .insert_backdated(NewEntry::plain(user, "fixture entry"), &ts_on(*day, 12))
            .await
            .unwrap();
    }
    store
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_streak_counts_consecutive_days() {
    let today = date(2026, 8, 23);
    let store = store_with_days(
        "u1",
        &[today, today - Duration::days(1), today - Duration::days(2)],
    )
    .await;

    assert_eq!(current_streak(&store, "u1", today).await.unwrap(), 3);
}

#[tokio::test]
async fn test_streak_survives_grace_day() {
    let today = date(2026, 8, 23);
    let store = store_with_days(
        "u1",
        &[
            today - Duration::days(1),
            today - Duration::days(2),
            today - Duration::days(3),
        ],
    )
    .await;

    assert_eq!(current_streak(&store, "u1", today).await.unwrap(), 3);
}

#[tokio::test]
async fn test_streak_crosses_window_boundary() {
    // 35 consecutive days ending today spans two 30-day windows.
    let today = date(2026, 8, 23);
    let days: Vec<NaiveDate> = (0..35).map(|i| today - Duration::days(i)).collect();
    let store = store_with_days("u1", &days).await;

    assert_eq!(current_streak(&store, "u1", today).await.unwrap(), 35);
}

#[tokio::test]
async fn test_streak_is_per_user() {
    let today = date(2026, 8, 23);
    let store = store_with_days("u1", &[today, today - Duration::days(1)]).await;

    assert_eq!(current_streak(&store, "u1", today).await.unwrap(), 2);
    assert_eq!(current_streak(&store, "u2", today).await.unwrap(), 0);
}

#[tokio::test]
async fn test_lapsed_streak_is_zero() {
    let today = date(2026, 8, 23);
    let store = store_with_days(
        "u1",
        &[today - Duration::days(2), today - Duration::days(3)],
    )
    .await;

    assert_eq!(current_streak(&store, "u1", today).await.unwrap(), 0);
}

#[tokio::test]
async fn test_weekly_feels_seven_chronological_slots() {
    let today = date(2026, 8, 23);
    let store = SqliteStore::open_in_memory().unwrap();

    let mut entry = NewEntry::plain("u1", "a good day");
    entry.mood_score = 0.6;
    store
        .insert_backdated(entry, &ts_on(today, 9))
        .await
        .unwrap();

    let mut entry = NewEntry::plain("u1", "a heavy day");
    entry.mood_score = -0.8;
    store
        .insert_backdated(entry, &ts_on(today - Duration::days(3), 20))
        .await
        .unwrap();

    let slots = weekly_feels(&store, "u1", today).await.unwrap();
    assert_eq!(slots.len(), 7);

    assert_eq!(slots[0].date, today - Duration::days(6));
    assert_eq!(slots[6].date, today);

    assert_eq!(slots[6].entry, "a good day");
    assert_eq!(slots[6].mood, 0.6);
    assert_eq!(slots[3].entry, "a heavy day");
    assert_eq!(slots[3].mood, -0.8);

    // Days without entries are empty placeholders, not skipped.
    for i in [0, 1, 2, 4, 5] {
        assert!(slots[i].entry.is_empty());
        assert_eq!(slots[i].mood, 0.0);
    }
}

#[tokio::test]
async fn test_weekly_feels_most_recent_entry_per_day() {
    let today = date(2026, 8, 23);
    let store = SqliteStore::open_in_memory().unwrap();

    let mut morning = NewEntry::plain("u1", "rough start");
    morning.mood_score = -0.5;
    store
        .insert_backdated(morning, &ts_on(today, 8))
        .await
        .unwrap();

    let mut evening = NewEntry::plain("u1", "much better now");
    evening.mood_score = 0.4;
    store
        .insert_backdated(evening, &ts_on(today, 21))
        .await
        .unwrap();

    let slots = weekly_feels(&store, "u1", today).await.unwrap();
    assert_eq!(slots[6].entry, "much better now");
    assert_eq!(slots[6].mood, 0.4);
}

#[tokio::test]
async fn test_weekly_feels_excludes_older_entries() {
    let today = date(2026, 8, 23);
    let store = store_with_days("u1", &[today - Duration::days(7)]).await;

    let slots = weekly_feels(&store, "u1", today).await.unwrap();
    assert!(slots.iter().all(|s| s.entry.is_empty()));
}
