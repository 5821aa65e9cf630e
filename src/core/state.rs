//! # Application State
//!
//! Core business state for Chatbox. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // completion service
//! ├── transcript: Transcript                 // conversation history
//! ├── turn: TurnState                        // Idle | AwaitingReply
//! ├── model_name / max_output_tokens / temperature
//! ├── status_message: String                 // header status text
//! └── next_turn_id: u64                      // tags replies to their turn
//! ```
//!
//! State changes only happen through `update(state, view, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, ResolvedConfig};
use crate::core::view::IndicatorHandle;
use crate::inference::{CompletionProvider, DEFAULT_SYSTEM_PROMPT, Transcript};

/// Shown once when the application starts.
pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
/// Shown after the conversation is cleared.
pub const CLEARED_GREETING: &str = "Chat cleared! How can I help you?";

/// Where the current turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingReply {
        turn_id: u64,
        indicator: IndicatorHandle,
    },
}

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub transcript: Transcript,
    pub turn: TurnState,
    pub model_name: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub status_message: String,
    pub next_turn_id: u64,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>, model_name: String) -> Self {
        Self {
            provider,
            transcript: Transcript::new(DEFAULT_SYSTEM_PROMPT),
            turn: TurnState::Idle,
            model_name,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            status_message: String::from("Ready"),
            next_turn_id: 0,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        Self {
            transcript: Transcript::new(config.system_prompt.clone()),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            ..Self::new(provider, config.model_name.clone())
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.turn, TurnState::AwaitingReply { .. })
    }
}
