//! OpenAI-compatible provider using the Chat Completions API.
//!
//! One request per turn, no streaming:
//! `POST {base_url}/chat/completions` with the full transcript, answered by a
//! single JSON body whose first choice carries the reply.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// The request body. Messages serialize straight from the transcript.
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Error envelope: `{"error": {"message": "..."}}`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    message: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Pulls the human-readable message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Maps a non-success status to the matching error variant.
fn status_to_error(status: StatusCode, body: &str) -> ProviderError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        other => ProviderError::Api {
            status: other.as_u16(),
            message,
        },
    }
}

/// Extracts the reply from a success body.
fn parse_reply(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))?;
    let content = choice
        .message
        .content
        .ok_or_else(|| ProviderError::Parse("first choice has no content".to_string()))?;
    Ok(content.trim().to_string())
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct OpenAiProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new provider.
    ///
    /// # Arguments
    /// * `api_key` - API key; `None` makes every request fail with `MissingCredential`
    /// * `base_url` - Optional custom base URL (defaults to OpenAI's API)
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No API key configured, skipping request");
            return Err(ProviderError::MissingCredential);
        };

        let body = ChatRequest {
            model: request.model,
            messages: request.transcript.messages(),
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        info!(
            "Chat completion request: model={}, messages={}, max_tokens={}, temperature={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Chat completion response status: {}", status);

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Completion API error: {} - {}", status, text);
            return Err(status_to_error(status, &text));
        }

        let reply = parse_reply(&text)?;
        info!("Chat completion reply: {} bytes", reply.len());
        Ok(reply)
    }
}
