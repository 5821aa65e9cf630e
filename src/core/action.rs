//! # Actions
//!
//! Everything that can happen in Chatbox becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The completion task finishes? That's `Action::ReplyReceived { .. }`.
//!
//! `update()` applies an action to the state and the render surface, then
//! returns an `Effect` describing the I/O the caller must perform. The reducer
//! itself never spawns tasks or talks to the network.
//!
//! ```text
//! State + View + Action  →  update()  →  Effect
//! ```
//!
//! Turn lifecycle:
//!
//! ```text
//!            Submit (non-empty)                 ReplyReceived (same turn_id)
//!   Idle ───────────────────────▶ AwaitingReply ─────────────────────────────▶ Idle
//!                                      │
//!                                      └── Clear ──▶ Idle (late reply is discarded)
//! ```

use log::{debug, info, warn};

use crate::core::state::{App, CLEARED_GREETING, TurnState};
use crate::core::view::{Bubble, ChatView};
use crate::inference::{ProviderError, reply_text};

#[derive(Debug)]
pub enum Action {
    /// The user submitted the input box contents.
    Submit(String),
    /// The background completion for `turn_id` finished.
    ReplyReceived {
        turn_id: u64,
        reply: Result<String, ProviderError>,
    },
    /// Reset the conversation and the view.
    Clear,
    Quit,
}

/// Side effects the event loop must carry out after `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Launch the completion request for this turn off the UI thread.
    SpawnRequest { turn_id: u64 },
    Quit,
}

pub fn update(app: &mut App, view: &mut dyn ChatView, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, view, text),
        Action::ReplyReceived { turn_id, reply } => receive_reply(app, view, turn_id, reply),
        Action::Clear => {
            if let TurnState::AwaitingReply { turn_id, .. } = app.turn {
                info!("Clearing while turn {} is in flight; its reply will be dropped", turn_id);
            }
            app.transcript.reset();
            app.turn = TurnState::Idle;
            view.clear();
            view.append(Bubble::assistant(CLEARED_GREETING));
            app.status_message = String::from("Chat cleared");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, view: &mut dyn ChatView, text: String) -> Effect {
    let text = text.trim();
    if text.is_empty() {
        debug!("Ignoring empty submission");
        return Effect::None;
    }

    if let TurnState::AwaitingReply { turn_id, .. } = app.turn {
        warn!("Rejecting submission while turn {} is awaiting a reply", turn_id);
        app.status_message = String::from("Still waiting for the previous reply");
        return Effect::None;
    }

    app.transcript.push_user(text);
    view.append(Bubble::user(text));
    let indicator = view.show_indicator();

    let turn_id = app.next_turn_id;
    app.next_turn_id += 1;
    app.turn = TurnState::AwaitingReply { turn_id, indicator };
    app.status_message = String::from("Thinking...");

    info!(
        "Turn {} submitted ({} bytes), transcript now {} messages",
        turn_id,
        text.len(),
        app.transcript.len()
    );
    Effect::SpawnRequest { turn_id }
}

fn receive_reply(
    app: &mut App,
    view: &mut dyn ChatView,
    turn_id: u64,
    reply: Result<String, ProviderError>,
) -> Effect {
    let indicator = match app.turn {
        TurnState::AwaitingReply {
            turn_id: current,
            indicator,
        } if current == turn_id => indicator,
        _ => {
            warn!("Discarding reply for stale turn {}", turn_id);
            return Effect::None;
        }
    };

    if !view.remove(indicator) {
        warn!("Pending indicator for turn {} was already gone", turn_id);
    }

    app.status_message = match &reply {
        Ok(_) => String::from("Ready"),
        Err(e) => {
            warn!("Turn {} failed: {}", turn_id, e);
            String::from("Request failed")
        }
    };

    let text = reply_text(reply);
    app.transcript.push_assistant(text.as_str());
    view.append(Bubble::assistant(text));
    app.turn = TurnState::Idle;

    info!("Turn {} complete, transcript now {} messages", turn_id, app.transcript.len());
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::{Alignment, IndicatorHandle};
    use crate::inference::{Message, Role};
    use crate::test_support::{RecordingView, test_app};

    /// Runs one full turn: submit, then deliver `reply` for the spawned turn.
    fn run_turn(
        app: &mut App,
        view: &mut RecordingView,
        text: &str,
        reply: Result<String, ProviderError>,
    ) {
        let effect = update(app, view, Action::Submit(text.to_string()));
        let Effect::SpawnRequest { turn_id } = effect else {
            panic!("expected SpawnRequest, got {effect:?}");
        };
        update(app, view, Action::ReplyReceived { turn_id, reply });
    }

    #[test]
    fn hi_produces_seed_user_assistant() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        run_turn(&mut app, &mut view, "Hi", Ok("Hello, human!".to_string()));

        assert_eq!(
            app.transcript.messages(),
            &[
                Message::new(Role::System, app.transcript.system_prompt()),
                Message::new(Role::User, "Hi"),
                Message::new(Role::Assistant, "Hello, human!"),
            ]
        );
        assert_eq!(app.turn, TurnState::Idle);
    }

    #[test]
    fn n_turns_give_one_plus_two_n_alternating() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        for n in 1..=4 {
            run_turn(&mut app, &mut view, &format!("question {n}"), Ok(format!("answer {n}")));
            assert_eq!(app.transcript.len(), 1 + 2 * n);
        }

        let messages = app.transcript.messages();
        assert_eq!(messages[0].role(), Role::System);
        for (i, message) in messages.iter().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
            assert_eq!(message.role(), expected, "message {i}");
        }
        assert_eq!(view.bubbles.len(), 8);
    }

    #[test]
    fn blank_submissions_change_nothing() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        for blank in ["", "   ", "\n\t  \n"] {
            let effect = update(&mut app, &mut view, Action::Submit(blank.to_string()));
            assert_eq!(effect, Effect::None);
        }

        assert_eq!(app.transcript.len(), 1);
        assert!(view.bubbles.is_empty());
        assert_eq!(view.indicators_shown, 0);
        assert_eq!(app.turn, TurnState::Idle);
    }

    #[test]
    fn submission_is_trimmed_and_rendered_on_the_right() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        update(&mut app, &mut view, Action::Submit("  hello there \n".to_string()));

        assert_eq!(app.transcript.last().content(), "hello there");
        assert_eq!(view.bubbles, vec![Bubble::user("hello there")]);
        assert_eq!(view.bubbles[0].alignment, Alignment::Right);
        assert!(view.live_indicator.is_some());
        assert!(app.is_awaiting_reply());
    }

    #[test]
    fn clear_resets_transcript_and_shows_one_greeting() {
        let mut app = test_app();
        let mut view = RecordingView::default();
        run_turn(&mut app, &mut view, "one", Ok("two".to_string()));
        run_turn(&mut app, &mut view, "three", Ok("four".to_string()));

        update(&mut app, &mut view, Action::Clear);

        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.messages()[0].role(), Role::System);
        assert_eq!(view.bubbles, vec![Bubble::assistant(CLEARED_GREETING)]);
        assert_eq!(view.clears, 1);
    }

    #[test]
    fn every_failure_category_yields_one_reply_and_one_removal() {
        let failures = [
            ProviderError::MissingCredential,
            ProviderError::Authentication("invalid key".into()),
            ProviderError::RateLimited("quota".into()),
            ProviderError::Network("connection reset".into()),
        ];

        for failure in failures {
            let mut app = test_app();
            let mut view = RecordingView::default();
            let expected = failure.user_message();

            run_turn(&mut app, &mut view, "Hi", Err(failure));

            assert_eq!(app.transcript.len(), 3);
            let last = app.transcript.last();
            assert_eq!(last.role(), Role::Assistant);
            assert_eq!(last.content(), expected);
            assert_eq!(view.removals, 1, "indicator must be removed exactly once");
            assert_eq!(view.failed_removals, 0);
            assert!(view.live_indicator.is_none());
            assert_eq!(view.bubbles.last(), Some(&Bubble::assistant(expected)));
        }
    }

    #[test]
    fn overlapping_submission_is_rejected() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        let first = update(&mut app, &mut view, Action::Submit("first".to_string()));
        let second = update(&mut app, &mut view, Action::Submit("second".to_string()));

        assert!(matches!(first, Effect::SpawnRequest { .. }));
        assert_eq!(second, Effect::None);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(view.bubbles.len(), 1);
        assert_eq!(view.indicators_shown, 1);
        assert_eq!(app.status_message, "Still waiting for the previous reply");
    }

    #[test]
    fn reply_after_clear_is_discarded() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        let Effect::SpawnRequest { turn_id } =
            update(&mut app, &mut view, Action::Submit("Hi".to_string()))
        else {
            panic!("expected SpawnRequest");
        };
        update(&mut app, &mut view, Action::Clear);
        update(
            &mut app,
            &mut view,
            Action::ReplyReceived {
                turn_id,
                reply: Ok("too late".to_string()),
            },
        );

        assert_eq!(app.transcript.len(), 1);
        assert_eq!(view.bubbles, vec![Bubble::assistant(CLEARED_GREETING)]);
        // Clear tore the indicator down; the late reply must not try again
        assert_eq!(view.removals, 0);
        assert_eq!(view.failed_removals, 0);
    }

    #[test]
    fn new_turn_after_clear_gets_a_fresh_id() {
        let mut app = test_app();
        let mut view = RecordingView::default();

        let Effect::SpawnRequest { turn_id: stale } =
            update(&mut app, &mut view, Action::Submit("Hi".to_string()))
        else {
            panic!("expected SpawnRequest");
        };
        update(&mut app, &mut view, Action::Clear);
        let Effect::SpawnRequest { turn_id: fresh } =
            update(&mut app, &mut view, Action::Submit("Again".to_string()))
        else {
            panic!("expected SpawnRequest");
        };
        assert_ne!(stale, fresh);

        // The stale reply arrives first and must not complete the new turn
        update(
            &mut app,
            &mut view,
            Action::ReplyReceived {
                turn_id: stale,
                reply: Ok("old".to_string()),
            },
        );
        assert!(app.is_awaiting_reply());

        update(
            &mut app,
            &mut view,
            Action::ReplyReceived {
                turn_id: fresh,
                reply: Ok("new".to_string()),
            },
        );
        assert_eq!(app.transcript.last().content(), "new");
        assert_eq!(app.transcript.len(), 3);
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        let mut view = RecordingView::default();
        assert_eq!(update(&mut app, &mut view, Action::Quit), Effect::Quit);
    }

    #[test]
    fn reply_with_unknown_turn_while_idle_is_ignored() {
        let mut app = test_app();
        let mut view = RecordingView::default();
        let effect = update(
            &mut app,
            &mut view,
            Action::ReplyReceived {
                turn_id: 42,
                reply: Ok("stray".to_string()),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), 1);
        assert!(view.bubbles.is_empty());
        assert!(!view.remove(IndicatorHandle(42)));
    }
}
