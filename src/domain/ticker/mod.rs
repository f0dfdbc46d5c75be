//! Ticker domain — best ask/bid snapshots per market, TTL-gated refresh.

pub mod client;
mod convert;
pub mod state;
pub mod wire;

pub use state::TickerCache;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest known prices for one market.
///
/// Every field is optional: `None` means "unknown", never an error. The
/// default value (all `None`) is what a market that was never fetched reads as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub last: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<Decimal>,
}

impl TickerSnapshot {
    pub fn new(ask: Option<Decimal>, bid: Option<Decimal>) -> Self {
        Self {
            ask,
            bid,
            ..Self::default()
        }
    }

    /// Mid price (average of bid and ask).
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    /// Spread between ask and bid.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ask.is_none() && self.bid.is_none()
    }
}

/// What a call to [`client::Tickers::request_fetch`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Session invalid; nothing was sent.
    NotAuthenticated,
    /// Refreshed too recently; nothing was sent.
    CacheFresh,
    /// Fetched and stored.
    Updated,
    /// Fetch failed (or returned nothing); only the refresh stamp moved.
    Failed,
}
