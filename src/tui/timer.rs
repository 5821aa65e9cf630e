//! # UI-thread Timers
//!
//! A repeating timer that is polled by the event loop instead of running on
//! its own thread, so whatever it drives can touch view state safely.
//!
//! Each timer is tied to the lifetime of the element it animates through a
//! [`Liveness`] token: the element revokes the token when it is destroyed, and
//! the timer checks the token before every reschedule. Once revoked the timer
//! reports [`TimerPoll::Expired`] and never fires again.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared "is the owner still alive" flag. Cloning shares the same flag.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Marks the owner as gone. Idempotent.
    pub fn revoke(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPoll {
    /// The timer fired; carries the zero-based tick count.
    Fired(usize),
    /// Not due yet; carries the remaining wait.
    Pending(Duration),
    /// The owner is gone. Drop the timer.
    Expired,
}

#[derive(Debug)]
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Instant,
    liveness: Liveness,
    ticks: usize,
}

impl RepeatingTimer {
    /// First fire after `initial_delay`, then every `interval`.
    pub fn new(now: Instant, initial_delay: Duration, interval: Duration, liveness: Liveness) -> Self {
        Self {
            interval,
            next_due: now + initial_delay,
            liveness,
            ticks: 0,
        }
    }

    pub fn poll(&mut self, now: Instant) -> TimerPoll {
        if !self.liveness.is_alive() {
            return TimerPoll::Expired;
        }
        if now < self.next_due {
            return TimerPoll::Pending(self.next_due - now);
        }

        let tick = self.ticks;
        self.ticks += 1;
        // Reschedule relative to now so a stalled loop doesn't fire a burst
        self.next_due = now + self.interval;
        TimerPoll::Fired(tick)
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }
}
