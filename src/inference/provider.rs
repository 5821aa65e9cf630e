use std::fmt;

use async_trait::async_trait;

use super::types::Transcript;

/// Errors that can occur while asking a provider for a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No API key configured. Raised before any network I/O.
    MissingCredential,
    /// The service rejected the credential (HTTP 401).
    Authentication(String),
    /// The service is throttling us (HTTP 429).
    RateLimited(String),
    /// Network-level failure (DNS, connection refused, TLS, ...).
    Network(String),
    /// Any other non-success status.
    Api { status: u16, message: String },
    /// The response body could not be understood.
    Parse(String),
}

/// Coarse failure categories used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingCredential,
    Authentication,
    RateLimit,
    Unexpected,
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::MissingCredential => FailureKind::MissingCredential,
            ProviderError::Authentication(_) => FailureKind::Authentication,
            ProviderError::RateLimited(_) => FailureKind::RateLimit,
            ProviderError::Network(_) | ProviderError::Api { .. } | ProviderError::Parse(_) => {
                FailureKind::Unexpected
            }
        }
    }

    /// The text rendered in the conversation in place of a reply.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::MissingCredential => {
                "Error: OpenAI API Key not found. Check your .env file.".to_string()
            }
            FailureKind::Authentication => {
                "Error: Invalid API Key. Please check your .env file".to_string()
            }
            FailureKind::RateLimit => "Error: Rate limit exceeded. Please wait a moment".to_string(),
            FailureKind::Unexpected => format!("Error: An unexpected error occurred: {self}"),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::MissingCredential => write!(f, "no API key configured"),
            ProviderError::Authentication(msg) => write!(f, "authentication failed: {msg}"),
            ProviderError::RateLimited(msg) => write!(f, "rate limited: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Collapses a completion outcome into the text that goes into the transcript.
pub fn reply_text(result: Result<String, ProviderError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => e.user_message(),
    }
}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    pub transcript: &'a Transcript,
    pub model: &'a str,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends the whole transcript and waits for the assistant's reply.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_maps_to_its_fixed_message() {
        assert_eq!(
            ProviderError::MissingCredential.user_message(),
            "Error: OpenAI API Key not found. Check your .env file."
        );
        assert_eq!(
            ProviderError::Authentication("bad key".into()).user_message(),
            "Error: Invalid API Key. Please check your .env file"
        );
        assert_eq!(
            ProviderError::RateLimited("slow down".into()).user_message(),
            "Error: Rate limit exceeded. Please wait a moment"
        );
    }

    #[test]
    fn unexpected_failures_embed_the_underlying_error() {
        let err = ProviderError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.kind(), FailureKind::Unexpected);
        assert_eq!(
            err.user_message(),
            "Error: An unexpected error occurred: API error (HTTP 503): overloaded"
        );

        let err = ProviderError::Network("connection refused".into());
        assert!(err.user_message().ends_with("network error: connection refused"));
    }

    #[test]
    fn reply_text_passes_successful_replies_through() {
        assert_eq!(reply_text(Ok("Hello, human!".into())), "Hello, human!");
        assert_eq!(
            reply_text(Err(ProviderError::RateLimited(String::new()))),
            "Error: Rate limit exceeded. Please wait a moment"
        );
    }
}
