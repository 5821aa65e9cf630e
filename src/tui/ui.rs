use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::button_bar;
use crate::tui::components::{ButtonBar, Header, MessageList};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Lays out and draws one frame:
///
/// ```text
/// ┌ header ───────────────────────────────────────┐
/// │ message list (scrollable)                     │
/// ├ input box (grows to 5 lines) ─┬ Clear ┬ Send ─┤
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let input_width = area.width.saturating_sub(button_bar::WIDTH);
    let input_height = tui.input_box.calculate_height(input_width);

    let [header_area, list_area, input_row] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);
    let [input_area, buttons_area] =
        Layout::horizontal([Min(0), Length(button_bar::WIDTH)]).areas(input_row);

    let awaiting = app.is_awaiting_reply();
    Header::new(&app.model_name, &app.status_message, awaiting).render(frame, header_area);
    MessageList::new(&mut tui.message_list).render(frame, list_area);
    tui.input_box.render(frame, input_area);
    ButtonBar::new(&mut tui.buttons, !awaiting).render(frame, buttons_area);
}
