//! # Typing Indicator
//!
//! The placeholder assistant bubble shown while a reply is pending. Its text
//! cycles "." → ".." → "..." on a [`RepeatingTimer`] owned by the event loop.
//!
//! The indicator owns the [`Liveness`] token of its timer. Dropping the
//! indicator (removal, replacement, or clear) revokes the token, so the timer
//! expires on its next poll instead of touching a bubble that no longer exists.

use std::time::{Duration, Instant};

use crate::core::view::{Bubble, IndicatorHandle};
use crate::tui::timer::{Liveness, RepeatingTimer};

/// Delay before the first animation step.
pub const FIRST_TICK: Duration = Duration::from_millis(100);
/// Delay between animation steps.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

const PHASES: usize = 3;

#[derive(Debug)]
pub struct PendingIndicator {
    handle: IndicatorHandle,
    /// 0 → ".", 1 → "..", 2 → "..."
    phase: usize,
    liveness: Liveness,
}

impl PendingIndicator {
    pub fn new(handle: IndicatorHandle) -> Self {
        Self {
            handle,
            phase: PHASES - 1,
            liveness: Liveness::new(),
        }
    }

    pub fn handle(&self) -> IndicatorHandle {
        self.handle
    }

    pub fn dots(&self) -> String {
        ".".repeat(self.phase + 1)
    }

    pub fn advance(&mut self) {
        self.phase = (self.phase + 1) % PHASES;
    }

    pub fn bubble(&self) -> Bubble {
        Bubble::assistant(self.dots())
    }

    /// Timer that drives this indicator until it is dropped.
    pub fn start_timer(&self, now: Instant) -> RepeatingTimer {
        RepeatingTimer::new(now, FIRST_TICK, TICK_INTERVAL, self.liveness.clone())
    }
}

impl Drop for PendingIndicator {
    fn drop(&mut self) {
        self.liveness.revoke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::timer::TimerPoll;

    #[test]
    fn starts_with_three_dots_and_cycles() {
        let mut indicator = PendingIndicator::new(IndicatorHandle(1));
        assert_eq!(indicator.dots(), "...");

        let seen: Vec<String> = (0..4)
            .map(|_| {
                indicator.advance();
                indicator.dots()
            })
            .collect();
        assert_eq!(seen, vec![".", "..", "...", "."]);
    }

    #[test]
    fn dropping_the_indicator_expires_its_timer() {
        let start = Instant::now();
        let indicator = PendingIndicator::new(IndicatorHandle(7));
        let mut timer = indicator.start_timer(start);

        assert_eq!(timer.poll(start + FIRST_TICK), TimerPoll::Fired(0));
        drop(indicator);
        assert_eq!(timer.poll(start + FIRST_TICK + TICK_INTERVAL), TimerPoll::Expired);
    }
}
