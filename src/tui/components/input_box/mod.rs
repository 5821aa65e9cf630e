//! # InputBox Component
//!
//! Multi-line message editor.
//!
//! ## Responsibilities
//!
//! - Capture text input, including pasted text with newlines
//! - Handle editing (backspace, delete, cursor movement)
//! - Handle submission (Enter), unless locked
//! - Grow with its content up to `MAX_VISIBLE_LINES`, then scroll
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `locked` is a prop synced from
//! the application state each frame: while a reply is pending, Enter keeps
//! the typed text instead of submitting it.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{
    CONTENT_PAD_H, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_position, inner_width,
    layout_rows, line_end, line_start, next_char_boundary, prev_char_boundary,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
    /// First visible row when content exceeds `MAX_VISIBLE_LINES`
    scroll_offset: usize,
    /// Submission is blocked while true (Prop)
    pub locked: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            locked: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Takes the buffer for sending. Returns `None` for blank text or while
    /// locked, leaving the buffer untouched.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.locked || self.buffer.trim().is_empty() {
            return None;
        }
        self.cursor = 0;
        self.scroll_offset = 0;
        Some(std::mem::take(&mut self.buffer))
    }

    /// Required height for the current buffer at `area_width`, clamped to
    /// `[1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD]`.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = layout_rows(&self.buffer, inner_width(area_width)).len() as u16;
        rows.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

/// Terminals deliver pasted line breaks as `\r` or `\r\n`.
fn normalize_paste(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "    ")
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = layout_rows(&self.buffer, inner_width(area.width));
        let (cursor_row, cursor_col) = cursor_position(&self.buffer, &rows, self.cursor);

        // Keep the cursor row inside the visible window
        let visible = (MAX_VISIBLE_LINES as usize).min(rows.len());
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + visible {
            self.scroll_offset = cursor_row + 1 - visible;
        }
        self.scroll_offset = self.scroll_offset.min(rows.len() - visible);

        let lines: Vec<Line> = rows[self.scroll_offset..self.scroll_offset + visible]
            .iter()
            .map(|r| Line::from(&self.buffer[r.start..r.end]))
            .collect();

        let (title, style) = if self.locked {
            (
                " Waiting for reply... ",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (" Message ", Style::default().fg(Color::White))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style)
            .title(title)
            .title_bottom(Line::from(" Enter send · Shift+Enter newline ").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);

        frame.render_widget(Paragraph::new(Text::from(lines)).style(style).block(block), area);

        if !inner.is_empty() {
            let y = (cursor_row - self.scroll_offset) as u16;
            let x = cursor_col.min(inner.width);
            frame.set_cursor_position((inner.x + x, inner.y + y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert(c.encode_utf8(&mut utf8));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert(&normalize_paste(text));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = line_start(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = line_end(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => self.take_submission().map(InputEvent::Submit),
            _ => None,
        }
    }
}
