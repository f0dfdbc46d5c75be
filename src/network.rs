//! Network URL constants and timing defaults.

use std::time::Duration;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Minimum interval between two ticker fetch attempts.
pub const DEFAULT_TICKER_TTL: Duration = Duration::from_secs(10 * 60);

/// How long transient UI state (errors, spinners) stays visible.
pub const DEFAULT_TRANSIENT_DELAY: Duration = Duration::from_millis(5000);
