//! Deepgram transcription client.
//!
//! Uploads recorded audio as multipart form data to the hosted listen
//! endpoint and extracts the first channel's top alternative transcript.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use super::Transcriber;

/// Errors from the transcription adapter. All of them mean the transcript
/// is unavailable; the pipeline falls back to an empty transcript rather
/// than aborting the flow.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Failed to read audio file {path}: {source}")]
    ReadAudio {
        path: String,
        source: std::io::Error,
    },

    #[error("Transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Transcription endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected transcription response shape")]
    Shape,
}

/// Deepgram API client
pub struct DeepgramClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Response envelope: {results: {channels: [{alternatives: [{transcript}]}]}}
#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

impl DeepgramClient {
    /// Create a client for the production endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.deepgram.com".to_string())
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn listen_url(&self) -> String {
        format!("{}/v1/listen", self.base_url)
    }

    /// Guess the upload MIME type from the file extension.
    fn mime_for(path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()) {
            Some("wav") => "audio/wav",
            Some("mp3") => "audio/mpeg",
            Some("ogg") => "audio/ogg",
            _ => "audio/m4a",
        }
    }
}

#[async_trait]
impl Transcriber for DeepgramClient {
    fn name(&self) -> &str {
        "deepgram"
    }

    async fn transcribe(&self, path: &Path) -> Result<String, TranscriptionError> {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TranscriptionError::ReadAudio {
                path: path.display().to_string(),
                source,
            })?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(Self::mime_for(path))
            .map_err(TranscriptionError::Request)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.listen_url())
            .header("Authorization", format!("Token {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ListenResponse = response.json().await?;

        parsed
            .results
            .and_then(|r| r.channels.into_iter().next())
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .ok_or(TranscriptionError::Shape)
    }
}
