pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, FailureKind, ProviderError, reply_text};
pub use providers::OpenAiProvider;
pub use types::{DEFAULT_SYSTEM_PROMPT, Message, Role, Transcript};
