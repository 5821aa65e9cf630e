//! Character-level wrapping for the input buffer.
//!
//! Unlike chat bubbles, the input box wraps at any character so that the
//! cursor position can be derived from byte offsets without re-running a
//! word wrapper. Each row is a byte range into the buffer.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Horizontal padding (per side) between the border and the text.
pub const CONTENT_PAD_H: u16 = 1;
/// Borders plus padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top and bottom borders.
pub const VERTICAL_OVERHEAD: u16 = 2;
/// The box grows with its content up to this many text rows, then scrolls.
pub const MAX_VISIBLE_LINES: u16 = 5;

/// One visual row: `buffer[start..end]`, excluding any trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub start: usize,
    pub end: usize,
}

/// Text columns available inside a box of `area_width`. Never zero.
pub fn inner_width(area_width: u16) -> usize {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize
}

/// Splits `text` into rows no wider than `width` columns.
/// Always returns at least one row.
pub fn layout_rows(text: &str, width: usize) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut row_width = 0;
        for (offset, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(0);
            if row_width + w > width && row_width > 0 {
                rows.push(Row {
                    start: row_start,
                    end: line_start + offset,
                });
                row_start = line_start + offset;
                row_width = 0;
            }
            row_width += w;
        }
        rows.push(Row {
            start: row_start,
            end: line_start + line.len(),
        });
        line_start += line.len() + 1;
    }

    rows
}

/// Visual (row, column) of byte offset `cursor`.
///
/// At a soft wrap the end of one row and the start of the next share an
/// offset; the cursor is placed at the start of the next row.
pub fn cursor_position(text: &str, rows: &[Row], cursor: usize) -> (usize, u16) {
    let index = rows
        .iter()
        .rposition(|r| r.start <= cursor && cursor <= r.end)
        .unwrap_or(0);
    let col = rows
        .get(index)
        .and_then(|r| text.get(r.start..cursor))
        .map_or(0, |s| s.width() as u16);
    (index, col)
}

pub fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

/// Start of the logical line containing `pos`.
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// End of the logical line containing `pos` (before its newline).
pub fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}
