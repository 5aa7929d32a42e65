//! Brain-dump enrichment pipeline: transcript → enhancement → persistence.
//!
//! Strictly sequential, one dump at a time (the recorder's state gate
//! enforces that upstream). Transcription and enhancement degrade
//! gracefully instead of losing the user's spoken content; only a store
//! failure surfaces as an error, and even then the pending text rides
//! along so the caller can offer a retry.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::{EnhancementError, Enhancer, Transcriber};
use crate::domain::{JournalEntry, NewEntry};
use crate::session::Session;
use crate::store::{JournalStore, StoreError};

/// Placeholder used when transcription yields nothing usable.
const EMPTY_TRANSCRIPT_PLACEHOLDER: &str = "No transcription available";

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Save/update failed; the text the user would have lost is preserved
    /// for retry.
    #[error("Failed to save entry: {source}")]
    Store {
        source: StoreError,
        pending_content: String,
    },
}

/// How a pipeline stage ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    /// The stage failed and the pipeline fell back; the message says why.
    Degraded(String),
}

impl StageOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// Result of one brain dump run.
#[derive(Debug, Clone)]
pub struct DumpOutcome {
    /// The saved entry
    pub entry: JournalEntry,

    /// Pre-enhancement transcript, always preserved
    pub raw_transcript: String,

    pub transcription: StageOutcome,
    pub enhancement: StageOutcome,
}

/// The capture-to-vault pipeline.
pub struct BrainDumpPipeline {
    transcriber: Arc<dyn Transcriber>,
    enhancer: Arc<dyn Enhancer>,
    store: Arc<dyn JournalStore>,
}

impl BrainDumpPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        enhancer: Arc<dyn Enhancer>,
        store: Arc<dyn JournalStore>,
    ) -> Self {
        Self {
            transcriber,
            enhancer,
            store,
        }
    }

    /// Run the pipeline from a finished audio file.
    pub async fn process_audio(
        &self,
        session: &Session,
        audio: &Path,
    ) -> Result<DumpOutcome, PipelineError> {
        let (raw, transcription) = match self.transcriber.transcribe(audio).await {
            Ok(text) if !text.trim().is_empty() => (text, StageOutcome::Succeeded),
            Ok(_) => (
                EMPTY_TRANSCRIPT_PLACEHOLDER.to_string(),
                StageOutcome::Degraded("empty transcript".to_string()),
            ),
            Err(e) => {
                warn!("Transcription failed, falling back to placeholder: {}", e);
                (
                    EMPTY_TRANSCRIPT_PLACEHOLDER.to_string(),
                    StageOutcome::Degraded(e.to_string()),
                )
            }
        };

        self.enhance_and_save(session, raw, transcription).await
    }

    /// Run the pipeline from an already-available transcript (e.g. the
    /// user edited the text before saving).
    pub async fn process_transcript(
        &self,
        session: &Session,
        raw: &str,
    ) -> Result<DumpOutcome, PipelineError> {
        self.enhance_and_save(session, raw.to_string(), StageOutcome::Succeeded)
            .await
    }

    async fn enhance_and_save(
        &self,
        session: &Session,
        raw: String,
        transcription: StageOutcome,
    ) -> Result<DumpOutcome, PipelineError> {
        let (new_entry, enhancement) = match self.enhancer.enhance(&raw).await {
            Ok(enhanced) => {
                info!(mood = %enhanced.mood, "Enhancement succeeded");
                (
                    NewEntry::enhanced(&session.user_id, enhanced),
                    StageOutcome::Succeeded,
                )
            }
            // The model replied, but not with JSON: salvage its reply as
            // the entry text, mood fields empty.
            Err(EnhancementError::PayloadParse { raw: content }) => {
                warn!("Enhancement payload was not JSON, using content as-is");
                (
                    NewEntry::plain(&session.user_id, content),
                    StageOutcome::Degraded("payload parse failed".to_string()),
                )
            }
            // Request-level failure: keep the original transcript.
            Err(e) => {
                warn!("Enhancement failed, keeping raw transcript: {}", e);
                (
                    NewEntry::plain(&session.user_id, raw.clone()),
                    StageOutcome::Degraded(e.to_string()),
                )
            }
        };

        let pending_content = new_entry.content.clone();
        let entry = self
            .store
            .create(new_entry)
            .await
            .map_err(|source| PipelineError::Store {
                source,
                pending_content,
            })?;

        info!(id = %entry.id, "Entry saved");
        Ok(DumpOutcome {
            entry,
            raw_transcript: raw,
            transcription,
            enhancement,
        })
    }
}
