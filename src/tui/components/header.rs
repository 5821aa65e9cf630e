//! # Header Component
//!
//! Top bar with the application title, the model in use and the current
//! status ("Ready", "Thinking...", "Chat cleared").
//!
//! Header is purely presentational: it receives all data as props and has
//! no internal state.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub const TITLE: &str = "🤖 Chatbox";

const HEADER_BG: Color = Color::Rgb(0x20, 0x22, 0x25);
const TITLE_FG: Color = Color::Rgb(0x57, 0xf2, 0x87);

pub struct Header<'a> {
    pub model_name: &'a str,
    pub status_message: &'a str,
    pub awaiting_reply: bool,
}

impl<'a> Header<'a> {
    pub fn new(model_name: &'a str, status_message: &'a str, awaiting_reply: bool) -> Self {
        Self {
            model_name,
            status_message,
            awaiting_reply,
        }
    }
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let base = Style::default().bg(HEADER_BG).fg(Color::Gray);
        let status_style = if self.awaiting_reply {
            base.fg(Color::Yellow)
        } else {
            base
        };

        let left = Line::from(vec![
            Span::styled(format!(" {TITLE}"), base.fg(TITLE_FG).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  model: {}", self.model_name), base),
        ]);
        let right = Line::from(Span::styled(format!("{} ", self.status_message), status_style));

        let status_width = right.width() as u16;
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

        frame.render_widget(Paragraph::new(left).style(base), left_area);
        frame.render_widget(Paragraph::new(right).style(base).right_aligned(), right_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(header: &mut Header, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| header.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_title_model_and_status() {
        let text = render_to_string(&mut Header::new("gpt-3.5-turbo", "Ready", false), 80);

        assert!(text.contains("Chatbox"));
        assert!(text.contains("model: gpt-3.5-turbo"));
        assert!(text.trim_end().ends_with("Ready"));
    }

    #[test]
    fn status_is_highlighted_while_waiting() {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        let mut header = Header::new("m", "Thinking...", true);
        terminal.draw(|f| header.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        // "Thinking... " is right-aligned; its first char sits 12 columns from the edge
        assert_eq!(buffer[(48, 0)].symbol(), "T");
        assert_eq!(buffer[(48, 0)].fg, Color::Yellow);
    }
}
