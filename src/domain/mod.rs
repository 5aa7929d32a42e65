//! Domain types for the soulscribe journal.
//!
//! - Entry: persisted journal entries, enhancement output, user profiles
//! - Mood: the fixed mood tier scale and weekly-feels slots

pub mod entry;
pub mod mood;

// Re-export commonly used types
pub use entry::{Enhancement, JournalEntry, NewEntry, UserProfile};
pub use mood::{DayFeel, MoodTier};
