//! soulscribe - voice journaling engine
//!
//! Capture a spoken brain dump, transcribe it, enhance it into a
//! polished journal entry with mood metadata, and store it in a
//! per-user vault. Insights (streaks, weekly mood) are derived from
//! the vault on demand.
//!
//! # Architecture
//!
//! The flow is a strict sequential pipeline with graceful degradation:
//! - Transcription failure falls back to a placeholder entry
//! - Enhancement failure falls back to the raw transcript
//! - Only a store failure aborts, and the pending text survives it
//!
//! # Modules
//!
//! - `capture`: audio recorder state machine and backends
//! - `adapters`: Deepgram transcription and OpenAI enhancement clients
//! - `pipeline`: transcript → enhancement → persistence
//! - `store`: the journal vault (SQLite-backed)
//! - `domain`: entries, profiles, mood tiers
//! - `insights`: streaks and weekly feels
//! - `session`: explicit user session and its local cache mirror
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Record a brain dump
//! soulscribe record --user alice
//!
//! # Process a pre-recorded file
//! soulscribe record --user alice --input dump.m4a
//!
//! # Browse and reflect
//! soulscribe vault --user alice --year 2026 --month 8
//! soulscribe streak --user alice
//! soulscribe feels --user alice
//! ```

pub mod adapters;
pub mod capture;
pub mod cli;
pub mod config;
pub mod domain;
pub mod insights;
pub mod pipeline;
pub mod session;
pub mod store;

// Re-export main types at crate root for convenience
pub use adapters::{DeepgramClient, Enhancer, OpenAiClient, Transcriber};
pub use capture::{AudioBackend, CommandBackend, Recorder};
pub use domain::{DayFeel, Enhancement, JournalEntry, MoodTier, NewEntry, UserProfile};
pub use pipeline::{BrainDumpPipeline, DumpOutcome, StageOutcome};
pub use session::{Session, SessionCache};
pub use store::{JournalStore, SqliteStore};
