//! # MessageList Component
//!
//! Scrollable view of the conversation bubbles, and the TUI's implementation
//! of [`ChatView`].
//!
//! ## Architecture
//!
//! `MessageListState` is persistent: it owns the bubbles, the pending
//! indicator, the layout cache and the scroll position. `MessageList` is a
//! transient component created each frame that wraps `&mut MessageListState`.
//!
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass, aligning with Ratatui's
//! `StatefulWidget` pattern.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::view::{Bubble, ChatView, IndicatorHandle};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::bubble::{BubbleLayout, BubbleView};
use crate::tui::components::typing_indicator::PendingIndicator;
use crate::tui::event::TuiEvent;
use crate::tui::timer::RepeatingTimer;

/// Blank rows below each bubble.
const ROW_GAP: u16 = 1;

fn row_height(bubble: &Bubble, content_width: u16) -> u16 {
    BubbleLayout::measure(bubble, content_width)
        .height
        .saturating_add(ROW_GAP)
}

/// Narrows a conversation row count to the scroll canvas' coordinate space.
fn canvas_rows(rows: u32) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Bubbles, pending indicator, and layout/scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    bubbles: Vec<Bubble>,
    indicator: Option<PendingIndicator>,
    next_indicator_id: u64,
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Last rendered canvas height, indicator included
    pub content_height: u16,
    /// Conversation row at which the canvas starts. Non-zero once the
    /// conversation outgrows a `u16` canvas and older bubbles are cut.
    canvas_base: u32,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            bubbles: Vec::new(),
            indicator: None,
            next_indicator_id: 0,
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            content_height: 0,
            canvas_base: 0,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn indicator(&self) -> Option<&PendingIndicator> {
        self.indicator.as_ref()
    }

    /// Steps the indicator animation. Returns `false` if there is none.
    pub fn advance_indicator(&mut self) -> bool {
        match self.indicator.as_mut() {
            Some(indicator) => {
                indicator.advance();
                true
            }
            None => false,
        }
    }

    /// Starts the animation timer for the current indicator, if any.
    pub fn indicator_timer(&self, now: Instant) -> Option<RepeatingTimer> {
        self.indicator.as_ref().map(|i| i.start_timer(now))
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl ChatView for MessageListState {
    fn append(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
        self.stick_to_bottom = true;
    }

    fn show_indicator(&mut self) -> IndicatorHandle {
        let handle = IndicatorHandle(self.next_indicator_id);
        self.next_indicator_id += 1;
        // Replacing drops the old indicator, which stops its timer
        self.indicator = Some(PendingIndicator::new(handle));
        self.stick_to_bottom = true;
        handle
    }

    fn remove(&mut self, handle: IndicatorHandle) -> bool {
        if self.indicator.as_ref().is_some_and(|i| i.handle() == handle) {
            self.indicator = None;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.bubbles.clear();
        self.indicator = None;
        self.layout = LayoutCache::new();
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
        self.content_height = 0;
        self.canvas_base = 0;
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with a reference to the persistent state.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState) -> Self {
        Self { state }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let state = &mut *self.state;

        // 1. Update layout cache. Bubbles never change once appended,
        // so only new ones (or all of them, after a resize) are measured.
        let reusable = state.layout.reusable_count(state.bubbles.len(), content_width);
        state.layout.heights.truncate(reusable);
        for bubble in state.bubbles.iter().skip(reusable) {
            state.layout.heights.push(row_height(bubble, content_width));
        }
        state.layout.rebuild_prefix_heights();
        state.layout.content_width = content_width;

        let indicator_bubble = state.indicator.as_ref().map(PendingIndicator::bubble);
        let indicator_height = indicator_bubble
            .as_ref()
            .map_or(0, |b| row_height(b, content_width));

        // 2. Pick the newest bubbles that fit a u16 canvas alongside the indicator
        let first = state
            .layout
            .first_fitting(u32::from(u16::MAX - indicator_height));
        let base = state.layout.row_top(first);
        if !state.stick_to_bottom && base != state.canvas_base {
            // The canvas moved; keep the same conversation rows in view
            let offset = state.scroll_state.offset();
            let absolute = state.canvas_base.saturating_add(u32::from(offset.y));
            state.scroll_state.set_offset(Position {
                x: offset.x,
                y: canvas_rows(absolute.saturating_sub(base)),
            });
        }
        state.canvas_base = base;
        let bubbles_height = canvas_rows(state.layout.total_height() - base);

        // 3. Clamp scroll offset to prevent overscrolling past content
        state.content_height = bubbles_height.saturating_add(indicator_height);
        state.viewport_height = area.height;
        if state.stick_to_bottom {
            let bottom = state.content_height.saturating_sub(area.height);
            state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            state.clamp_scroll();
        }

        let scroll_offset = base.saturating_add(u32::from(state.scroll_state.offset().y));
        let visible_range = state.layout.visible_range(scroll_offset, area.height);

        // 4. Render visible bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, state.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range.start.max(first)..visible_range.end {
            let top = canvas_rows(state.layout.row_top(i) - base);
            let height = state.layout.heights[i] - ROW_GAP;
            let rect = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(BubbleView::new(&state.bubbles[i]), rect);
        }

        if let Some(bubble) = &indicator_bubble {
            let rect = Rect::new(0, bubbles_height, content_width, indicator_height - ROW_GAP);
            scroll_view.render_widget(BubbleView::new(bubble), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because scrolling mutates persistent state, and `MessageList` only lives
/// for one frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Cached row heights for the appended bubbles. Running totals are `u32`
/// so an arbitrarily long conversation never overflows.
#[derive(Debug, Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u32>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many cached heights are still valid for `bubble_count` bubbles
    /// rendered at `content_width`.
    pub fn reusable_count(&self, bubble_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.heights.len().min(bubble_count)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u32, |acc, &h| {
                *acc = acc.saturating_add(u32::from(h));
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Conversation row at which bubble `index` starts. `index` may equal
    /// the bubble count, giving the total height.
    pub fn row_top(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// Index of the oldest bubble from which the rest of the conversation
    /// fits within `budget` rows.
    pub fn first_fitting(&self, budget: u32) -> usize {
        let total = self.total_height();
        if total <= budget {
            return 0;
        }
        let cut = total - budget;
        self.prefix_heights.partition_point(|&end| end < cut) + 1
    }

    /// Bubbles overlapping the viewport, padded by half a page either side.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = u32::from(viewport_height / 2);
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(u32::from(viewport_height))
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
