use serde::{Deserialize, Serialize};

/// Default system instruction seeded into every new transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Who authored a message. Serialized with the role names completion APIs expect.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message. Immutable once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The ordered conversation history sent to the model on every turn.
///
/// Always starts with exactly one system message. Messages are only ever
/// appended; the whole transcript can be reset back to its seeded state.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl Transcript {
    /// Creates a transcript seeded with the given system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(Role::System, system_prompt)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true; the seed message is always present. Provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system_prompt(&self) -> &str {
        self.messages[0].content()
    }

    pub fn last(&self) -> &Message {
        // Non-empty by construction
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::new(Role::User, content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::new(Role::Assistant, content))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.last()
    }

    /// Drops every message after the seed.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }
}
