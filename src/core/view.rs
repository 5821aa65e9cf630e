//! # Render Surface Contract
//!
//! The operations the turn controller needs from whatever draws the
//! conversation. The TUI's `MessageListState` implements this; tests use a
//! recording fake. Keeping it as a trait keeps `core` free of ratatui types.

pub const ASSISTANT_AVATAR: &str = "🤖";
pub const USER_AVATAR: &str = "👤";

/// Which side of the viewport a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Assistant bubbles: left-aligned, neutral styling, avatar shown.
    Left,
    /// User bubbles: right-aligned, accent styling.
    Right,
}

/// One rendered message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub avatar: String,
    pub text: String,
    pub alignment: Alignment,
}

impl Bubble {
    pub fn new(avatar: impl Into<String>, text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            avatar: avatar.into(),
            text: text.into(),
            alignment,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ASSISTANT_AVATAR, text, Alignment::Left)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(USER_AVATAR, text, Alignment::Right)
    }
}

/// Identifies one pending ("typing") indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorHandle(pub u64);

pub trait ChatView {
    /// Adds a bubble at the bottom and schedules a scroll to it.
    fn append(&mut self, bubble: Bubble);

    /// Shows the pending indicator, replacing any previous one.
    fn show_indicator(&mut self) -> IndicatorHandle;

    /// Removes the indicator if `handle` still refers to it.
    /// Returns `false` when it was already gone.
    fn remove(&mut self, handle: IndicatorHandle) -> bool;

    /// Removes every bubble and any indicator.
    fn clear(&mut self);
}
