//! Derived views over stored entries: streaks and weekly mood.
//!
//! Both recompute from the store on demand; there is no maintained
//! summary record.

pub mod streak;
pub mod weekly;

pub use streak::current_streak;
pub use weekly::weekly_feels;
