//! The owned state object and the actions that change it.
//!
//! All mutation goes through [`DeskState::dispatch`], one action at a time.
//! Network completions arrive as actions too, so nothing is ever half-applied.

use crate::clock::Timestamp;
use crate::domain::order::{OrderRecord, OrderStore, OrderUpdate};
use crate::domain::ticker::{TickerCache, TickerSnapshot};
use crate::foreground::{ErrorChannel, ForegroundError};
use crate::shared::{MarketSpec, OrderId};
use std::time::Duration;

/// A discrete state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A ticker fetch completed. `None` means the server answered with nothing.
    TickerFetched {
        spec: MarketSpec,
        snapshot: Option<TickerSnapshot>,
    },
    /// A ticker fetch failed.
    TickerFetchFailed { spec: MarketSpec },
    /// Merge an order update (optimistic or server-confirmed).
    OrderUpdated(OrderUpdate),
    /// Show a message on the foreground error channel.
    SetForegroundError(String),
}

#[derive(Debug, Clone)]
pub struct DeskState {
    tickers: TickerCache,
    orders: OrderStore,
    foreground: ForegroundError,
}

impl DeskState {
    pub fn new(ticker_ttl: Duration, transient_delay: Duration) -> Self {
        Self {
            tickers: TickerCache::new(ticker_ttl),
            orders: OrderStore::new(),
            foreground: ForegroundError::new(transient_delay),
        }
    }

    /// Apply one action at time `now`.
    pub fn dispatch(&mut self, action: Action, now: Timestamp) {
        match action {
            Action::TickerFetched {
                spec,
                snapshot: Some(snapshot),
            } => {
                tracing::debug!("ticker: stored {}", spec);
                self.tickers.record_success(spec, snapshot, now);
            }
            Action::TickerFetched {
                spec,
                snapshot: None,
            } => {
                tracing::debug!("ticker: empty response for {}", spec);
                self.tickers.record_failure(now);
            }
            Action::TickerFetchFailed { .. } => {
                self.tickers.record_failure(now);
            }
            Action::OrderUpdated(update) => {
                self.orders.apply(update);
            }
            Action::SetForegroundError(message) => {
                self.foreground.set_foreground(message, now);
            }
        }
    }

    pub fn tickers(&self) -> &TickerCache {
        &self.tickers
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    pub fn ticker(&self, spec: &MarketSpec) -> TickerSnapshot {
        self.tickers.get(spec)
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&OrderRecord> {
        self.orders.get(order_id)
    }

    /// The foreground error visible at `now`.
    pub fn foreground_error(&mut self, now: Timestamp) -> Option<String> {
        self.foreground.current(now).map(str::to_string)
    }

    /// Fire due transient clears. Returns `true` if anything visible changed.
    pub fn expire_transients(&mut self, now: Timestamp) -> bool {
        self.foreground.expire(now)
    }

    pub fn next_transient_deadline(&self) -> Option<Timestamp> {
        self.foreground.next_deadline()
    }

    /// Forget all cached tickers (e.g. on logout). Orders are kept.
    pub fn clear_tickers(&mut self) {
        self.tickers.clear();
    }
}

impl Default for DeskState {
    fn default() -> Self {
        Self::new(
            crate::network::DEFAULT_TICKER_TTL,
            crate::network::DEFAULT_TRANSIENT_DELAY,
        )
    }
}
