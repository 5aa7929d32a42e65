//! Consecutive-day journaling streak.
//!
//! History is fetched in expanding 30-day windows walking backward from
//! today, stopping at the first empty window, so long streaks are found
//! without one unbounded query. A one-day grace period keeps the streak
//! alive when the user journaled yesterday but not yet today.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::store::{day_end, day_start, JournalStore, StoreError};

/// Days per lookup window.
const WINDOW_DAYS: i64 = 30;

/// Lookback cap: 24 windows (~2 years). A streak longer than this
/// reports the capped count.
const MAX_WINDOWS: usize = 24;

/// Compute the current streak for a user, with `today` as the local
/// calendar day the count is anchored to.
pub async fn current_streak(
    store: &dyn JournalStore,
    user_id: &str,
    today: NaiveDate,
) -> Result<u32, StoreError> {
    let mut days: HashSet<NaiveDate> = HashSet::new();
    let mut window_end = today;

    for window in 0..MAX_WINDOWS {
        let window_start = window_end - Duration::days(WINDOW_DAYS - 1);
        let entries = store
            .list_by_date_range(user_id, &day_start(window_start), &day_end(window_end))
            .await?;

        if entries.is_empty() {
            debug!(window, "Empty window, streak history exhausted");
            break;
        }

        for entry in &entries {
            if let Some(key) = entry.date_key() {
                days.insert(key);
            }
        }

        window_end = window_start - Duration::days(1);
    }

    Ok(streak_from_days(&days, today))
}

/// Walk backward over the set of journaled days.
fn streak_from_days(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);

    // Lapsed: neither today nor the grace day has an entry.
    if !days.contains(&today) && !days.contains(&yesterday) {
        return 0;
    }

    let mut day = if days.contains(&today) { today } else { yesterday };
    let mut count = 0;
    while days.contains(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}
