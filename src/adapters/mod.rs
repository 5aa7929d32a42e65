//! Adapter interfaces for the hosted speech-to-text and enhancement
//! services.
//!
//! The pipeline talks to these through traits so tests can substitute
//! in-memory fakes for the network clients.

pub mod deepgram;
pub mod openai;

use std::path::Path;

use async_trait::async_trait;

pub use deepgram::{DeepgramClient, TranscriptionError};
pub use openai::{EnhancementError, OpenAiClient};

use crate::domain::Enhancement;

/// Speech-to-text over a finished audio resource.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Transcribe the audio file at `path` to raw text.
    ///
    /// Single attempt: any network, status, or shape failure is returned
    /// as-is and the caller decides the fallback.
    async fn transcribe(&self, path: &Path) -> Result<String, TranscriptionError>;
}

/// LLM grammar correction + mood/sentiment extraction.
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Enhance a raw transcript into a structured journal entry.
    async fn enhance(&self, raw: &str) -> Result<Enhancement, EnhancementError>;
}
