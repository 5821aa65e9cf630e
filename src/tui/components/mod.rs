//! # TUI Components
//!
//! UI components for the terminal interface.
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `Header`: title, model name and status
//! - `BubbleView`: a single chat bubble
//! - `ButtonBar`: the `Clear Chat` / `Send` buttons (writes back its hit areas)
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `InputBox`: multi-line text input, locked while a reply is pending
//! - `MessageList`: scrollable conversation view with layout caching; its
//!   state implements the core `ChatView` contract
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── header.rs           (top bar)
//! ├── bubble.rs           (single bubble: measure + render)
//! ├── typing_indicator.rs (pending "..." bubble and its timer)
//! ├── message_list.rs     (scrollable bubble container)
//! ├── button_bar.rs       (clickable buttons)
//! └── input_box/          (text input + character wrapping)
//! ```

pub mod bubble;
pub mod button_bar;
pub mod header;
pub mod input_box;
pub mod message_list;
pub mod typing_indicator;

pub use button_bar::{Button, ButtonAreas, ButtonBar};
pub use header::Header;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
