//! End-to-end turn flow: reducer → completion task → channel → reducer,
//! against a real HTTP mock and a recording render surface.

use std::sync::{Arc, mpsc};

use chatbox::core::action::{Action, Effect, update};
use chatbox::core::state::{App, CLEARED_GREETING};
use chatbox::core::view::{Alignment, Bubble, ChatView, IndicatorHandle};
use chatbox::inference::OpenAiProvider;
use chatbox::tui::spawn_request;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct Screen {
    bubbles: Vec<Bubble>,
    indicator: Option<IndicatorHandle>,
    next_handle: u64,
}

impl ChatView for Screen {
    fn append(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
    }

    fn show_indicator(&mut self) -> IndicatorHandle {
        let handle = IndicatorHandle(self.next_handle);
        self.next_handle += 1;
        self.indicator = Some(handle);
        handle
    }

    fn remove(&mut self, handle: IndicatorHandle) -> bool {
        if self.indicator == Some(handle) {
            self.indicator = None;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.bubbles.clear();
        self.indicator = None;
    }
}

fn app_for(server: &MockServer, api_key: Option<&str>) -> App {
    let provider = OpenAiProvider::new(api_key.map(str::to_string), Some(server.uri()));
    App::new(Arc::new(provider), "gpt-3.5-turbo".to_string())
}

async fn mount_reply(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Submits `text` and runs the spawned request to completion.
async fn run_turn(app: &mut App, screen: &mut Screen, text: &str) -> Action {
    let Effect::SpawnRequest { turn_id } = update(app, screen, Action::Submit(text.to_string()))
    else {
        panic!("submission of {text:?} did not start a turn");
    };
    let (tx, rx) = mpsc::channel();
    spawn_request(app, turn_id, tx).await.unwrap();
    rx.try_recv().unwrap()
}

fn texts(screen: &Screen) -> Vec<&str> {
    screen.bubbles.iter().map(|b| b.text.as_str()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_two_turn_conversation() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({ "choices": [{ "message": { "role": "assistant", "content": "Hello!" } }] }),
    )
    .await;

    let mut app = app_for(&server, Some("test-key"));
    let mut screen = Screen::default();

    for prompt in ["Hi", "  And again?  "] {
        let reply = run_turn(&mut app, &mut screen, prompt).await;
        assert!(app.is_awaiting_reply());
        assert_eq!(update(&mut app, &mut screen, reply), Effect::None);
        assert!(!app.is_awaiting_reply());
    }

    assert_eq!(texts(&screen), vec!["Hi", "Hello!", "And again?", "Hello!"]);
    assert_eq!(screen.bubbles[0].alignment, Alignment::Right);
    assert_eq!(screen.bubbles[1].alignment, Alignment::Left);
    assert!(screen.indicator.is_none());
    // system + 2 × (user, assistant)
    assert_eq!(app.transcript.len(), 5);
    assert_eq!(app.status_message, "Ready");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["messages"].as_array().unwrap().len(), 4);
    assert_eq!(second["messages"][3]["content"], "And again?");
}

#[tokio::test]
async fn test_missing_key_is_reported_in_the_conversation() {
    let server = MockServer::start().await;
    let mut app = app_for(&server, None);
    let mut screen = Screen::default();

    let reply = run_turn(&mut app, &mut screen, "Hello").await;
    update(&mut app, &mut screen, reply);

    assert_eq!(
        texts(&screen),
        vec!["Hello", "Error: OpenAI API Key not found. Check your .env file."]
    );
    assert_eq!(
        app.transcript.last().content(),
        "Error: OpenAI API Key not found. Check your .env file."
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rate_limit_reply_and_recovery() {
    let server = MockServer::start().await;
    mount_reply(&server, 429, json!({ "error": { "message": "slow down" } })).await;

    let mut app = app_for(&server, Some("test-key"));
    let mut screen = Screen::default();

    let reply = run_turn(&mut app, &mut screen, "Hello").await;
    update(&mut app, &mut screen, reply);

    assert_eq!(
        screen.bubbles.last().map(|b| b.text.as_str()),
        Some("Error: Rate limit exceeded. Please wait a moment")
    );
    // The conversation stays usable after a failure
    assert!(!app.is_awaiting_reply());
    assert!(matches!(
        update(&mut app, &mut screen, Action::Submit("retry".into())),
        Effect::SpawnRequest { .. }
    ));
}

#[tokio::test]
async fn test_reply_arriving_after_clear_is_dropped() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({ "choices": [{ "message": { "content": "too late" } }] }),
    )
    .await;

    let mut app = app_for(&server, Some("test-key"));
    let mut screen = Screen::default();

    let late = run_turn(&mut app, &mut screen, "Hello").await;
    update(&mut app, &mut screen, Action::Clear);
    update(&mut app, &mut screen, late);

    assert_eq!(texts(&screen), vec![CLEARED_GREETING]);
    assert_eq!(app.transcript.len(), 1);
    assert!(!app.is_awaiting_reply());
}
