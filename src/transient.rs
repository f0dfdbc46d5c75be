//! Transient state: a value that clears itself a fixed delay after being set.
//!
//! Every `set` schedules its own clear. A later `set` does not cancel clears
//! scheduled by earlier ones, so an earlier deadline can wipe a newer value
//! before that value's own delay has run out. Deadlines are processed lazily
//! whenever the state is read or [`TransientState::expire`] is called.

use crate::clock::{add_duration, Timestamp};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransientState<T> {
    value: Option<T>,
    /// Pending clear deadlines, in scheduling order.
    pending: Vec<Timestamp>,
    delay: Duration,
}

impl<T> TransientState<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            value: None,
            pending: Vec::new(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Store `value` and schedule a clear at `now + delay`.
    ///
    /// Clears already due at `now` fire first, so they cannot take the new
    /// value with them.
    pub fn set(&mut self, value: T, now: Timestamp) {
        self.expire(now);
        self.value = Some(value);
        self.pending.push(add_duration(now, self.delay));
    }

    /// Fire every clear whose deadline is at or before `now`.
    ///
    /// Returns `true` if a value was cleared.
    pub fn expire(&mut self, now: Timestamp) -> bool {
        let before = self.pending.len();
        self.pending.retain(|deadline| *deadline > now);
        if self.pending.len() == before {
            return false;
        }
        self.value.take().is_some()
    }

    /// Current value as of `now`, after firing due clears.
    pub fn get(&mut self, now: Timestamp) -> Option<&T> {
        self.expire(now);
        self.value.as_ref()
    }

    /// Current value without processing deadlines.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Earliest scheduled clear that has not fired yet.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.iter().min().copied()
    }
}

/// Sleep for `duration` on the current platform's timer.
pub(crate) async fn sleep(duration: Duration) {
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    gloo_timers::future::sleep(duration).await;

    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    futures_timer::Delay::new(duration).await;
}
