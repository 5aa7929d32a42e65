//! Weekly feels: the last 7 local calendar days, one representative
//! entry per day.
//!
//! Slots come back in chronological order, 6-days-ago through today. A
//! day with multiple entries keeps only the most recent one (the store
//! returns descending order, so the first seen wins); a day with none is
//! an empty placeholder with mood 0.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{DayFeel, JournalEntry};
use crate::store::{day_end, day_start, JournalStore, StoreError};

/// Aggregate the last 7 days of entries for a user, anchored to `today`.
pub async fn weekly_feels(
    store: &dyn JournalStore,
    user_id: &str,
    today: NaiveDate,
) -> Result<Vec<DayFeel>, StoreError> {
    let start = today - Duration::days(6);
    let entries = store
        .list_by_date_range(user_id, &day_start(start), &day_end(today))
        .await?;

    Ok(build_slots(&entries, start))
}

fn build_slots(entries: &[JournalEntry], start: NaiveDate) -> Vec<DayFeel> {
    // Descending query order: the first entry seen for a day is its most
    // recent, so or_insert keeps it.
    let mut by_day: HashMap<NaiveDate, &JournalEntry> = HashMap::new();
    for entry in entries {
        if let Some(key) = entry.date_key() {
            by_day.entry(key).or_insert(entry);
        }
    }

    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            match by_day.get(&date) {
                Some(entry) => DayFeel {
                    date,
                    mood: entry.mood_score,
                    entry: entry.content.clone(),
                },
                None => DayFeel::empty(date),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::format_timestamp;
    use chrono::{Local, NaiveTime, TimeZone, Utc};
    use uuid::Uuid;

    fn entry_on(date: NaiveDate, hour: u32, content: &str, score: f64) -> JournalEntry {
        // Anchor to local wall-clock time so date_key() buckets the entry
        // onto `date` regardless of the test machine's timezone.
        let local = Local
            .from_local_datetime(&date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()))
            .single()
            .unwrap();
        JournalEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            content: content.into(),
            mood: "test".into(),
            mood_score: score,
            sentiment: String::new(),
            created_at: format_timestamp(local.with_timezone(&Utc)),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_always_seven_slots() {
        let start = date(2026, 8, 17);
        assert_eq!(build_slots(&[], start).len(), 7);

        let one = vec![entry_on(date(2026, 8, 20), 9, "only one", 0.5)];
        assert_eq!(build_slots(&one, start).len(), 7);
    }

    #[test]
    fn test_slots_are_chronological() {
        let start = date(2026, 8, 17);
        let slots = build_slots(&[], start);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.date, start + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_empty_day_placeholder() {
        let start = date(2026, 8, 17);
        let slots = build_slots(&[], start);
        assert!(slots.iter().all(|s| s.mood == 0.0 && s.entry.is_empty()));
    }

    #[test]
    fn test_most_recent_entry_wins_for_a_day() {
        let day = date(2026, 8, 20);
        let start = date(2026, 8, 17);
        // Descending order, as the store returns them.
        let entries = vec![
            entry_on(day, 21, "evening", 0.8),
            entry_on(day, 8, "morning", -0.4),
        ];

        let slots = build_slots(&entries, start);
        let slot = &slots[3];
        assert_eq!(slot.date, day);
        assert_eq!(slot.entry, "evening");
        assert_eq!(slot.mood, 0.8);
    }

    #[test]
    fn test_entries_land_on_their_days() {
        let start = date(2026, 8, 17);
        let entries = vec![
            entry_on(date(2026, 8, 23), 10, "today", 0.2),
            entry_on(date(2026, 8, 17), 10, "week ago", -0.2),
        ];

        let slots = build_slots(&entries, start);
        assert_eq!(slots[6].entry, "today");
        assert_eq!(slots[0].entry, "week ago");
        assert!(slots[1..6].iter().all(|s| s.entry.is_empty()));
    }
}
