//! Foreground error channel — the single user-visible error message slot.

use crate::clock::Timestamp;
use crate::transient::TransientState;
use std::time::Duration;

/// Receives user-facing error messages.
pub trait ErrorChannel {
    fn set_foreground(&mut self, message: String, now: Timestamp);
}

/// In-memory [`ErrorChannel`]: the latest message, auto-cleared after the
/// transient delay.
#[derive(Debug, Clone)]
pub struct ForegroundError {
    state: TransientState<String>,
}

impl ForegroundError {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: TransientState::new(delay),
        }
    }

    /// The message visible at `now`, if any.
    pub fn current(&mut self, now: Timestamp) -> Option<&str> {
        self.state.get(now).map(String::as_str)
    }

    pub fn expire(&mut self, now: Timestamp) -> bool {
        self.state.expire(now)
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.state.next_deadline()
    }
}

impl ErrorChannel for ForegroundError {
    fn set_foreground(&mut self, message: String, now: Timestamp) {
        tracing::debug!("Foreground error: {}", message);
        self.state.set(message, now);
    }
}
