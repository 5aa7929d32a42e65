//! OpenAI chat-completions enhancement client.
//!
//! Sends the raw transcript with a fixed system instruction and expects
//! the completion content to itself be a JSON document of shape
//! `{entry, mood, moodScore, sentiment}`.
//!
//! Two failure points are kept distinct: the request/envelope can fail,
//! or the envelope can parse while the embedded payload is not valid
//! JSON. The second case carries the raw content string so the caller can
//! salvage it as the entry text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Enhancer;
use crate::domain::Enhancement;

/// Fixed system instruction for the enhancement step.
const SYSTEM_PROMPT: &str = "You are a journaling assistant. Rewrite the user's \
spoken brain dump into a clear, grammatical journal entry, preserving their \
voice and meaning. Then analyze its emotional tone. Reply with ONLY a JSON \
object of the form {\"entry\": string, \"mood\": single lowercase word, \
\"moodScore\": number between -1 and 1, \"sentiment\": short phrase such as \
\"very positive\"}. No markdown, no commentary.";

/// Errors from the enhancement adapter.
#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("Enhancement request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Enhancement endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed chat completion envelope")]
    Envelope,

    #[error("Completion content is not valid enhancement JSON")]
    PayloadParse {
        /// The raw content string, preserved so the caller can use it as
        /// the entry text.
        raw: String,
    },
}

/// OpenAI chat completions client
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client for the production endpoint with default tuning.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com".to_string(), model, 0.7, 500)
    }

    /// Fully parameterized constructor (config layer and tests).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        model: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Parse the embedded payload out of a completion content string.
    ///
    /// Models sometimes wrap the JSON in a code fence despite the
    /// instruction; strip that before parsing, but fail closed on
    /// anything else.
    fn parse_payload(content: &str) -> Result<Enhancement, EnhancementError> {
        let trimmed = content.trim();
        let candidate = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|s| s.strip_suffix("```"))
            .map(str::trim)
            .unwrap_or(trimmed);

        serde_json::from_str(candidate).map_err(|_| EnhancementError::PayloadParse {
            raw: content.to_string(),
        })
    }
}

#[async_trait]
impl Enhancer for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn enhance(&self, raw: &str) -> Result<Enhancement, EnhancementError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: raw,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnhancementError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response.json().await?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(EnhancementError::Envelope)?;

        Self::parse_payload(&content)
    }
}
