use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::view::{Alignment, Bubble};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;
/// Space between the avatar and an assistant bubble.
const AVATAR_GAP: u16 = 1;
/// Bubbles never take more than this share of the row, unless the row is tiny.
const MAX_WIDTH_PERCENT: u32 = 75;
/// Below this many columns the percentage cap is ignored.
const MIN_BUBBLE_WIDTH: u16 = 20;

pub const ASSISTANT_BG: Color = Color::Rgb(0x40, 0x44, 0x4b);
pub const USER_BG: Color = Color::Rgb(0x0d, 0x6e, 0xfd);
pub const AVATAR_FG: Color = Color::Rgb(0x57, 0xf2, 0x87);

/// Measured geometry of one bubble inside a row of a given width.
///
/// Text is wrapped here with `textwrap` and rendered line by line, so the
/// height used for scrolling always matches what is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleLayout {
    pub lines: Vec<String>,
    /// Columns reserved on the left for the avatar (0 for user bubbles).
    pub avatar_width: u16,
    /// Outer width of the bubble including borders and padding.
    pub width: u16,
    /// Outer height of the bubble including borders.
    pub height: u16,
}

impl BubbleLayout {
    pub fn measure(bubble: &Bubble, row_width: u16) -> Self {
        let avatar_width = match bubble.alignment {
            Alignment::Left => bubble.avatar.width() as u16 + AVATAR_GAP,
            Alignment::Right => 0,
        };
        let available = row_width.saturating_sub(avatar_width);
        let capped = (u32::from(available) * MAX_WIDTH_PERCENT / 100) as u16;
        let max_width = capped.max(available.min(MIN_BUBBLE_WIDTH));
        let text_width = max_width.saturating_sub(HORIZONTAL_OVERHEAD);

        if text_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return Self {
                lines: Vec::new(),
                avatar_width,
                width: available,
                height: 1,
            };
        }

        let lines = wrap_text(&bubble.text, text_width as usize);
        let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0).max(1) as u16;

        Self {
            width: widest + HORIZONTAL_OVERHEAD,
            height: u16::try_from(lines.len())
                .unwrap_or(u16::MAX)
                .saturating_add(VERTICAL_OVERHEAD),
            lines,
            avatar_width,
        }
    }
}

/// Wraps on spaces, breaking words longer than `width`. Keeps explicit newlines.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let options = textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let lines: Vec<String> = textwrap::wrap(text.trim(), options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

pub fn bubble_style(alignment: Alignment) -> Style {
    match alignment {
        Alignment::Left => Style::default().fg(Color::White).bg(ASSISTANT_BG),
        Alignment::Right => Style::default().fg(Color::White).bg(USER_BG),
    }
}

/// A stateless widget that draws one bubble inside a full-width row.
///
/// Assistant bubbles hug the left edge after the avatar; user bubbles hug
/// the right edge and right-justify their text.
#[derive(Clone, Copy)]
pub struct BubbleView<'a> {
    pub bubble: &'a Bubble,
}

impl<'a> BubbleView<'a> {
    pub fn new(bubble: &'a Bubble) -> Self {
        Self { bubble }
    }
}

impl Widget for BubbleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let layout = BubbleLayout::measure(self.bubble, area.width);
        let style = bubble_style(self.bubble.alignment);

        let (x, text_alignment) = match self.bubble.alignment {
            Alignment::Left => {
                // Avatar sits next to the first line of text
                let avatar_y = area.y + 1u16.min(area.height - 1);
                buf.set_string(
                    area.x,
                    avatar_y,
                    &self.bubble.avatar,
                    Style::default().fg(AVATAR_FG).add_modifier(Modifier::BOLD),
                );
                (area.x + layout.avatar_width, ratatui::layout::Alignment::Left)
            }
            Alignment::Right => (
                area.x + area.width.saturating_sub(layout.width),
                ratatui::layout::Alignment::Right,
            ),
        };

        let right_edge = area.x + area.width;
        let rect = Rect::new(
            x,
            area.y,
            layout.width.min(right_edge.saturating_sub(x)),
            layout.height.min(area.height),
        );

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let text = Text::from(layout.lines.into_iter().map(Line::from).collect::<Vec<_>>());
        Paragraph::new(text)
            .style(style)
            .alignment(text_alignment)
            .render(inner, buf);
    }
}
