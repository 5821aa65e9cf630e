//! # ButtonBar Component
//!
//! The clickable `Clear Chat` and `Send` buttons to the right of the input
//! box. The rects they were drawn at are written back to [`ButtonAreas`] so
//! the event loop can hit-test mouse clicks against the last frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

const SEND_BG: Color = Color::Rgb(0x57, 0xf2, 0x87);
const CLEAR_BG: Color = Color::Rgb(0xed, 0x42, 0x45);

pub const SEND_LABEL: &str = "Send";
pub const CLEAR_LABEL: &str = "Clear Chat";

/// Total columns the bar occupies.
pub const WIDTH: u16 = CLEAR_WIDTH + SEND_WIDTH;
const CLEAR_WIDTH: u16 = CLEAR_LABEL.len() as u16 + 4;
const SEND_WIDTH: u16 = SEND_LABEL.len() as u16 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Send,
    Clear,
}

/// Where each button was last drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonAreas {
    pub send: Rect,
    pub clear: Rect,
}

impl ButtonAreas {
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Button> {
        let position = Position::new(column, row);
        if self.send.contains(position) {
            Some(Button::Send)
        } else if self.clear.contains(position) {
            Some(Button::Clear)
        } else {
            None
        }
    }
}

pub struct ButtonBar<'a> {
    pub areas: &'a mut ButtonAreas,
    /// Send is drawn dimmed while a reply is pending
    pub send_enabled: bool,
}

impl<'a> ButtonBar<'a> {
    pub fn new(areas: &'a mut ButtonAreas, send_enabled: bool) -> Self {
        Self {
            areas,
            send_enabled,
        }
    }
}

fn button(label: &str, bg: Color, enabled: bool) -> Paragraph<'_> {
    let style = if enabled {
        Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    };
    Paragraph::new(label).centered().style(style).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style.remove_modifier(Modifier::BOLD)),
    )
}

impl Component for ButtonBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [clear, send] =
            Layout::horizontal([Constraint::Length(CLEAR_WIDTH), Constraint::Length(SEND_WIDTH)])
                .areas(area);
        // Buttons keep a fixed 3-row height at the bottom of the input row
        let clear = bottom_rows(clear, 3);
        let send = bottom_rows(send, 3);

        frame.render_widget(button(CLEAR_LABEL, CLEAR_BG, true), clear);
        frame.render_widget(button(SEND_LABEL, SEND_BG, self.send_enabled), send);

        self.areas.clear = clear;
        self.areas.send = send;
    }
}

fn bottom_rows(area: Rect, rows: u16) -> Rect {
    let height = rows.min(area.height);
    Rect::new(area.x, area.y + area.height - height, area.width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn records_hit_areas_and_hit_tests() {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, 5)).unwrap();
        let mut areas = ButtonAreas::default();
        terminal
            .draw(|f| ButtonBar::new(&mut areas, true).render(f, f.area()))
            .unwrap();

        assert_eq!(areas.clear, Rect::new(0, 2, CLEAR_WIDTH, 3));
        assert_eq!(areas.send, Rect::new(CLEAR_WIDTH, 2, SEND_WIDTH, 3));

        assert_eq!(areas.hit_test(1, 3), Some(Button::Clear));
        assert_eq!(areas.hit_test(CLEAR_WIDTH + 1, 4), Some(Button::Send));
        assert_eq!(areas.hit_test(1, 0), None);
    }

    #[test]
    fn labels_are_drawn() {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, 3)).unwrap();
        let mut areas = ButtonAreas::default();
        terminal
            .draw(|f| ButtonBar::new(&mut areas, false).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(CLEAR_LABEL));
        assert!(text.contains(SEND_LABEL));
    }

    #[test]
    fn nothing_is_hit_before_first_render() {
        assert_eq!(ButtonAreas::default().hit_test(0, 0), None);
    }
}
