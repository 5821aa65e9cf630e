//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::view::{Bubble, ChatView, IndicatorHandle};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// A provider that answers every request with the same canned outcome.
pub struct ScriptedProvider {
    outcome: Result<String, ProviderError>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// A render surface that just records what it was asked to do.
#[derive(Default)]
pub struct RecordingView {
    pub bubbles: Vec<Bubble>,
    pub live_indicator: Option<IndicatorHandle>,
    pub indicators_shown: usize,
    pub removals: usize,
    pub failed_removals: usize,
    pub clears: usize,
}

impl ChatView for RecordingView {
    fn append(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
    }

    fn show_indicator(&mut self) -> IndicatorHandle {
        let handle = IndicatorHandle(self.indicators_shown as u64);
        self.indicators_shown += 1;
        self.live_indicator = Some(handle);
        handle
    }

    fn remove(&mut self, handle: IndicatorHandle) -> bool {
        if self.live_indicator == Some(handle) {
            self.live_indicator = None;
            self.removals += 1;
            true
        } else {
            self.failed_removals += 1;
            false
        }
    }

    fn clear(&mut self) {
        self.bubbles.clear();
        self.live_indicator = None;
        self.clears += 1;
    }
}

/// Creates a test App whose provider always replies "ok".
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(ScriptedProvider::replying("ok")),
        "test-model".to_string(),
    )
}
