//! Mood tier classification for the weekly feels visualization.
//!
//! Seven fixed tiers over the mood score: a symmetric six-tier scale plus
//! neutral. The classifier is a total function; scores outside [-1, 1]
//! land in the outermost tiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One step of the mood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTier {
    /// score >= 0.7
    Radiant,
    /// score >= 0.3
    Positive,
    /// score > 0
    MildPositive,
    /// score == 0
    Neutral,
    /// score > -0.3
    MildNegative,
    /// score > -0.7
    Negative,
    /// everything below
    Heavy,
}

impl MoodTier {
    /// Classify a mood score. Thresholds are checked top-down, so every
    /// float maps to exactly one tier (NaN falls through to `Heavy`).
    pub fn classify(score: f64) -> Self {
        if score >= 0.7 {
            Self::Radiant
        } else if score >= 0.3 {
            Self::Positive
        } else if score > 0.0 {
            Self::MildPositive
        } else if score == 0.0 {
            Self::Neutral
        } else if score > -0.3 {
            Self::MildNegative
        } else if score > -0.7 {
            Self::Negative
        } else {
            Self::Heavy
        }
    }

    /// Fixed display color for this tier.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Radiant => "#4CAF50",
            Self::Positive => "#8BC34A",
            Self::MildPositive => "#CDDC39",
            Self::Neutral => "#9E9E9E",
            Self::MildNegative => "#FFC107",
            Self::Negative => "#FF7043",
            Self::Heavy => "#E53935",
        }
    }

    /// Fixed emoji for this tier.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Radiant => "😄",
            Self::Positive => "🙂",
            Self::MildPositive => "😌",
            Self::Neutral => "😐",
            Self::MildNegative => "😕",
            Self::Negative => "☹️",
            Self::Heavy => "😞",
        }
    }
}

/// One day's slot in the weekly feels row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayFeel {
    /// Local calendar day
    pub date: NaiveDate,

    /// Representative mood score (0.0 when the day has no entry)
    pub mood: f64,

    /// Representative entry text ("" when the day has no entry)
    pub entry: String,
}

impl DayFeel {
    /// An empty placeholder slot for a day without entries.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mood: 0.0,
            entry: String::new(),
        }
    }

    /// Tier for this slot's mood score.
    pub fn tier(&self) -> MoodTier {
        MoodTier::classify(self.mood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(MoodTier::classify(1.0), MoodTier::Radiant);
        assert_eq!(MoodTier::classify(0.7), MoodTier::Radiant);
        assert_eq!(MoodTier::classify(0.69), MoodTier::Positive);
        assert_eq!(MoodTier::classify(0.3), MoodTier::Positive);
        assert_eq!(MoodTier::classify(0.29), MoodTier::MildPositive);
        assert_eq!(MoodTier::classify(0.0001), MoodTier::MildPositive);
        assert_eq!(MoodTier::classify(0.0), MoodTier::Neutral);
        assert_eq!(MoodTier::classify(-0.0001), MoodTier::MildNegative);
        assert_eq!(MoodTier::classify(-0.29), MoodTier::MildNegative);
        assert_eq!(MoodTier::classify(-0.3), MoodTier::Negative);
        assert_eq!(MoodTier::classify(-0.69), MoodTier::Negative);
        assert_eq!(MoodTier::classify(-0.7), MoodTier::Heavy);
        assert_eq!(MoodTier::classify(-1.0), MoodTier::Heavy);
    }

    #[test]
    fn test_tier_partition_is_total_over_range() {
        // Sweep [-1, 1]; every score must classify, and adjacent scores
        // must never skip backward through the scale.
        let order = |t: MoodTier| match t {
            MoodTier::Heavy => 0,
            MoodTier::Negative => 1,
            MoodTier::MildNegative => 2,
            MoodTier::Neutral => 3,
            MoodTier::MildPositive => 4,
            MoodTier::Positive => 5,
            MoodTier::Radiant => 6,
        };

        let mut last = 0;
        let mut seen = [false; 7];
        for i in -1000..=1000 {
            let score = i as f64 / 1000.0;
            let tier = order(MoodTier::classify(score));
            assert!(tier >= last, "tiers must be monotonic in score");
            seen[tier] = true;
            last = tier;
        }
        assert!(seen.iter().all(|s| *s), "all 7 tiers reachable in [-1, 1]");
    }

    #[test]
    fn test_out_of_range_scores_hit_outer_tiers() {
        assert_eq!(MoodTier::classify(1.5), MoodTier::Radiant);
        assert_eq!(MoodTier::classify(-2.0), MoodTier::Heavy);
        assert_eq!(MoodTier::classify(f64::NAN), MoodTier::Heavy);
    }

    #[test]
    fn test_empty_slot_is_neutral() {
        let slot = DayFeel::empty(NaiveDate::from_ymd_opt(2026, 8, 23).unwrap());
        assert_eq!(slot.tier(), MoodTier::Neutral);
        assert!(slot.entry.is_empty());
    }
}
