//! Ticker cache — app-owned, SDK-provided update logic.

use super::TickerSnapshot;
use crate::clock::{elapsed_at_least, Timestamp};
use crate::shared::MarketSpec;
use std::collections::HashMap;
use std::time::Duration;

/// Snapshots per market behind a single TTL gate.
///
/// One cache is one refresh bucket: `last_refresh` moves on every completed
/// fetch for any market, successful or not, and gates the next fetch for all
/// of them. A failing feed is therefore never refetched faster than a healthy
/// one, and failures leave no trace in the snapshots.
#[derive(Debug, Clone)]
pub struct TickerCache {
    ttl: Duration,
    last_refresh: Option<Timestamp>,
    tickers: HashMap<MarketSpec, TickerSnapshot>,
}

impl TickerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_refresh: None,
            tickers: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn last_refresh(&self) -> Option<Timestamp> {
        self.last_refresh
    }

    /// Whether a fetch may go out at `now`. Only recency matters, not content.
    pub fn should_fetch(&self, now: Timestamp) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => elapsed_at_least(last, now, self.ttl),
        }
    }

    /// Snapshot for `spec`, or an all-unknown snapshot if never fetched.
    pub fn get(&self, spec: &MarketSpec) -> TickerSnapshot {
        self.tickers.get(spec).cloned().unwrap_or_default()
    }

    /// Replace the snapshot for `spec` wholesale and restart the TTL window.
    pub fn record_success(&mut self, spec: MarketSpec, snapshot: TickerSnapshot, now: Timestamp) {
        self.tickers.insert(spec, snapshot);
        self.last_refresh = Some(now);
    }

    /// Restart the TTL window without touching any snapshot.
    pub fn record_failure(&mut self, now: Timestamp) {
        self.last_refresh = Some(now);
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Drop all snapshots and the refresh stamp.
    pub fn clear(&mut self) {
        self.tickers.clear();
        self.last_refresh = None;
    }
}
