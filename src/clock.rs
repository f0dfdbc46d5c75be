//! Time source injected into every TTL and timer decision.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wall-clock time in UTC.
pub type Timestamp = DateTime<Utc>;

/// Supplies the current time.
///
/// All cache and transient-state decisions read time through this trait, so
/// tests can drive them with a [`ManualClock`].
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The real clock (`Utc::now()`, which is backed by `Date.now()` on WASM).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Start at the Unix epoch.
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = add_duration(*now, by);
    }

    pub fn set(&self, to: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `at + by`, saturating at the far future instead of overflowing.
pub fn add_duration(at: Timestamp, by: Duration) -> Timestamp {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether at least `window` has passed between `since` and `now`.
///
/// A `now` earlier than `since` (clock stepped backwards) counts as no time
/// elapsed.
pub fn elapsed_at_least(since: Timestamp, now: Timestamp, window: Duration) -> bool {
    match (now - since).to_std() {
        Ok(elapsed) => elapsed >= window,
        Err(_) => window.is_zero(),
    }
}
