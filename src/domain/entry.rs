//! Journal entry and profile types.
//!
//! `created_at` is stored as a UTC ISO-8601 string with millisecond
//! precision (`2026-08-23T12:34:56.789Z`). The format sorts
//! lexicographically, which is what the store's range queries rely on.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Owner; every query is scoped to this
    pub user_id: String,

    /// Final (possibly user-edited) text
    pub content: String,

    /// Single-word mood label from enhancement (empty if degraded)
    pub mood: String,

    /// Sentiment polarity/intensity, nominally in [-1, 1].
    /// Out-of-range upstream values are stored as received.
    pub mood_score: f64,

    /// Short free-text sentiment phrase (empty if degraded)
    pub sentiment: String,

    /// Creation timestamp, immutable once set
    pub created_at: String,
}

impl JournalEntry {
    /// Local calendar day of this entry, used as the bucketing key.
    pub fn date_key(&self) -> Option<NaiveDate> {
        parse_timestamp(&self.created_at).map(|t| t.with_timezone(&Local).date_naive())
    }
}

/// Fields supplied when creating an entry; the store assigns id and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: String,
    pub content: String,
    pub mood: String,
    pub mood_score: f64,
    pub sentiment: String,
}

impl NewEntry {
    /// An entry carrying only text, mood fields empty (the degraded shape).
    pub fn plain(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            mood: String::new(),
            mood_score: 0.0,
            sentiment: String::new(),
        }
    }

    /// An entry built from an enhancement result.
    pub fn enhanced(user_id: impl Into<String>, enhancement: Enhancement) -> Self {
        Self {
            user_id: user_id.into(),
            content: enhancement.entry,
            mood: enhancement.mood,
            mood_score: enhancement.mood_score,
            sentiment: enhancement.sentiment,
        }
    }
}

/// Structured output of the enhancement step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    /// Grammar-corrected, restructured journal text
    pub entry: String,

    /// Single-word mood label
    pub mood: String,

    /// Mood score, nominally [-1, 1], passed through uncoerced
    #[serde(rename = "moodScore", deserialize_with = "lenient_f64")]
    pub mood_score: f64,

    /// Short sentiment phrase, e.g. "very positive"
    pub sentiment: String,
}

/// Per-user profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

/// Current time in the canonical timestamp format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format a UTC instant in the canonical timestamp format.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Returns None on malformed input rather than
/// failing the whole query.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Accept a mood score as a JSON number or a numeric string. The model
/// occasionally quotes the value; anything else becomes a parse error.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("moodScore is not numeric: {:?}", s))),
    }
}
