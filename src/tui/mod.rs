//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Everything that touches the transcript or the view runs on this thread:
//!
//! 1. Draw, if anything changed since the last frame.
//! 2. Poll terminal events, then drain any others already queued.
//! 3. Poll the typing indicator's timer and step the animation.
//! 4. Drain replies sent back by completion tasks.
//!
//! Completion requests run on tokio tasks and report back over an `mpsc`
//! channel, so the loop never blocks on the network.
//!
//! ## Redraw Strategy
//!
//! - **Waiting for a reply**: polls every ~80ms so the indicator animates and
//!   replies show up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.

mod component;
mod components;
mod event;
mod timer;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, GREETING};
use crate::core::view::{Bubble, ChatView};
use crate::inference::{CompletionProvider, CompletionRequest, OpenAiProvider};
use crate::tui::component::EventHandler;
use crate::tui::components::{Button, ButtonAreas, InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::timer::{RepeatingTimer, TimerPoll};

const ACTIVE_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Button rects from the last frame, for mouse hit testing
    pub buttons: ButtonAreas,
    /// Drives the typing indicator; expires when the indicator is gone
    pub indicator_timer: Option<RepeatingTimer>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            buttons: ButtonAreas::default(),
            indicator_timer: None,
        }
    }

    /// Polls the indicator timer. Returns `true` if the animation stepped.
    fn tick_indicator(&mut self, now: Instant) -> bool {
        let Some(timer) = self.indicator_timer.as_mut() else {
            return false;
        };
        match timer.poll(now) {
            TimerPoll::Fired(tick) => {
                debug!("Typing indicator tick {}", tick);
                self.message_list.advance_indicator()
            }
            TimerPoll::Pending(_) => false,
            TimerPoll::Expired => {
                debug!("Typing indicator timer expired after {} ticks", timer.ticks());
                self.indicator_timer = None;
                false
            }
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter.
        // Terminals that don't support it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the completion provider from resolved settings.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    let provider = OpenAiProvider::new(config.api_key.clone(), Some(config.base_url.clone()));
    if !provider.has_credential() {
        // Not fatal: each turn reports the missing key in the conversation
        warn!("No OpenAI API key configured");
    }
    Arc::new(provider)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new();
    tui.message_list.append(Bubble::assistant(GREETING));

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    // Replies from completion tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.input_box.locked = app.is_awaiting_reply();

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.is_awaiting_reply() || tui.indicator_timer.is_some() {
            ACTIVE_POLL
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => None,
                TuiEvent::Quit => Some(Action::Quit),
                TuiEvent::Clear => Some(Action::Clear),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    None
                }
                TuiEvent::MouseClick(column, row) => match tui.buttons.hit_test(column, row) {
                    Some(Button::Send) => tui.input_box.take_submission().map(Action::Submit),
                    Some(Button::Clear) => Some(Action::Clear),
                    None => None,
                },
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                    Some(InputEvent::ContentChanged) | None => None,
                },
            };

            if let Some(action) = action
                && dispatch(&mut app, &mut tui, &tx, action)
            {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        if tui.tick_indicator(Instant::now()) {
            needs_redraw = true;
        }

        // Replies from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, &mut tui, &tx, action);
        }
    }

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("Chatbox exited");
    Ok(())
}

/// Runs one action through the reducer and carries out its effect.
/// Returns `true` when the application should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, action: Action) -> bool {
    let effect = update(app, &mut tui.message_list, action);
    tui.input_box.locked = app.is_awaiting_reply();
    match effect {
        Effect::Quit => true,
        Effect::SpawnRequest { turn_id } => {
            spawn_request(app, turn_id, tx.clone());
            tui.indicator_timer = tui.message_list.indicator_timer(Instant::now());
            false
        }
        Effect::None => false,
    }
}

/// Sends the transcript to the provider on a tokio task and posts the
/// outcome back as `Action::ReplyReceived`.
///
/// The task works on a snapshot, so the UI thread stays the only writer
/// of the transcript.
pub fn spawn_request(
    app: &App,
    turn_id: u64,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Spawning {} completion request for turn {} ({} messages)",
        app.provider.name(),
        turn_id,
        app.transcript.len()
    );

    let provider = app.provider.clone();
    let transcript = app.transcript.clone();
    let model = app.model_name.clone();
    let max_output_tokens = app.max_output_tokens;
    let temperature = app.temperature;

    tokio::spawn(async move {
        let request = CompletionRequest {
            transcript: &transcript,
            model: &model,
            max_output_tokens,
            temperature,
        };

        let started = Instant::now();
        let reply = provider.complete(request).await;
        match &reply {
            Ok(text) => info!(
                "Turn {} completed by {} in {:?} ({} chars)",
                turn_id,
                provider.name(),
                started.elapsed(),
                text.len()
            ),
            Err(e) => warn!(
                "Turn {} failed on {} after {:?}: {}",
                turn_id,
                provider.name(),
                started.elapsed(),
                e
            ),
        }

        if tx.send(Action::ReplyReceived { turn_id, reply }).is_err() {
            warn!("Failed to deliver reply for turn {}: receiver dropped", turn_id);
        }
    })
}
