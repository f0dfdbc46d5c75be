//! High-level client — `DeskClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared state, and accessor methods.

use crate::clock::{Clock, SystemClock, Timestamp};
use crate::domain::order::client::Orders;
use crate::domain::order::OrderRecord;
use crate::domain::ticker::client::Tickers;
use crate::domain::ticker::TickerSnapshot;
use crate::exchange::ExchangeClient;
use crate::error::DeskError;
use crate::network::{DEFAULT_API_URL, DEFAULT_TICKER_TTL, DEFAULT_TRANSIENT_DELAY};
use crate::shared::{MarketSpec, OrderId};
use crate::store::{Action, DeskState};

use async_lock::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::ticker::client::Tickers as TickersClient;

/// The primary entry point.
///
/// Holds the exchange client, the clock and the shared [`DeskState`]. Clones
/// share the same state. Sub-clients: `client.tickers()`, `client.orders()`.
pub struct DeskClient<X, C = SystemClock> {
    pub(crate) exchange: Arc<X>,
    pub(crate) clock: C,
    pub(crate) state: Arc<RwLock<DeskState>>,
}

#[cfg(feature = "http")]
impl DeskClient<crate::http::DeskHttp, SystemClock> {
    /// Builder talking REST to [`DEFAULT_API_URL`] unless `base_url` or
    /// `exchange` says otherwise.
    pub fn builder() -> DeskClientBuilder<crate::http::DeskHttp, SystemClock> {
        DeskClientBuilder {
            exchange: None,
            connect: Some(connect_http),
            base_url: DEFAULT_API_URL.to_string(),
            clock: SystemClock,
            ticker_ttl: DEFAULT_TICKER_TTL,
            transient_delay: DEFAULT_TRANSIENT_DELAY,
        }
    }
}

#[cfg(feature = "http")]
fn connect_http(base_url: &str) -> Result<crate::http::DeskHttp, DeskError> {
    Ok(crate::http::DeskHttp::new(base_url)?)
}

impl<X: ExchangeClient, C: Clock> DeskClient<X, C> {
    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn tickers(&self) -> Tickers<'_, X, C> {
        Tickers { client: self }
    }

    pub fn orders(&self) -> Orders<'_, X, C> {
        Orders { client: self }
    }

    // ── State ────────────────────────────────────────────────────────────

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Apply one action, stamped with the current time.
    pub async fn dispatch(&self, action: Action) {
        let now = self.clock.now();
        self.state.write().await.dispatch(action, now);
    }

    /// Read access to the whole state.
    pub async fn state(&self) -> RwLockReadGuard<'_, DeskState> {
        self.state.read().await
    }

    pub async fn ticker(&self, spec: &MarketSpec) -> TickerSnapshot {
        self.state.read().await.ticker(spec)
    }

    pub async fn order(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.state.read().await.order(order_id).cloned()
    }

    /// The foreground error visible right now.
    pub async fn foreground_error(&self) -> Option<String> {
        let now = self.clock.now();
        self.state.write().await.foreground_error(now)
    }

    /// Sleep until the next scheduled transient clear, then fire it.
    ///
    /// Returns `false` immediately if nothing is scheduled. Intended for a
    /// UI loop that re-renders whenever this returns `true`.
    ///
    /// The wait is computed from the injected clock but slept on the platform
    /// timer. With a [`crate::clock::ManualClock`] that means real time equal
    /// to the manual gap; advance the clock past the deadline first to make
    /// this return without sleeping.
    pub async fn wait_for_next_clear(&self) -> bool {
        let Some(deadline) = self.state.read().await.next_transient_deadline() else {
            return false;
        };
        if let Ok(wait) = (deadline - self.clock.now()).to_std() {
            crate::transient::sleep(wait).await;
        }
        let now = self.clock.now();
        self.state.write().await.expire_transients(now)
    }

    /// Clear all ticker caches.
    pub async fn clear_ticker_cache(&self) {
        self.state.write().await.clear_tickers();
    }
}

impl<X, C: Clone> Clone for DeskClient<X, C> {
    fn clone(&self) -> Self {
        Self {
            exchange: self.exchange.clone(),
            clock: self.clock.clone(),
            state: self.state.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DeskClientBuilder<X, C> {
    exchange: Option<X>,
    /// Builds the exchange client from `base_url` when none was supplied.
    connect: Option<fn(&str) -> Result<X, DeskError>>,
    base_url: String,
    clock: C,
    ticker_ttl: Duration,
    transient_delay: Duration,
}

impl<X> DeskClientBuilder<X, SystemClock> {
    /// Builder around an already-constructed exchange client.
    pub fn new(exchange: X) -> Self {
        Self {
            exchange: Some(exchange),
            connect: None,
            base_url: DEFAULT_API_URL.to_string(),
            clock: SystemClock,
            ticker_ttl: DEFAULT_TICKER_TTL,
            transient_delay: DEFAULT_TRANSIENT_DELAY,
        }
    }
}

impl<X, C> DeskClientBuilder<X, C> {
    /// REST base URL. Ignored once an exchange client has been supplied.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Use `exchange` instead of the REST client.
    pub fn exchange<X2>(self, exchange: X2) -> DeskClientBuilder<X2, C> {
        DeskClientBuilder {
            exchange: Some(exchange),
            connect: None,
            base_url: self.base_url,
            clock: self.clock,
            ticker_ttl: self.ticker_ttl,
            transient_delay: self.transient_delay,
        }
    }

    pub fn ticker_ttl(mut self, ttl: Duration) -> Self {
        self.ticker_ttl = ttl;
        self
    }

    pub fn transient_delay(mut self, delay: Duration) -> Self {
        self.transient_delay = delay;
        self
    }

    /// Replace the time source (e.g. with a [`crate::clock::ManualClock`] in tests).
    pub fn clock<C2: Clock>(self, clock: C2) -> DeskClientBuilder<X, C2> {
        DeskClientBuilder {
            exchange: self.exchange,
            connect: self.connect,
            base_url: self.base_url,
            clock,
            ticker_ttl: self.ticker_ttl,
            transient_delay: self.transient_delay,
        }
    }

    pub fn build(self) -> Result<DeskClient<X, C>, DeskError> {
        let exchange = match (self.exchange, self.connect) {
            (Some(exchange), _) => exchange,
            (None, Some(connect)) => connect(&self.base_url)?,
            (None, None) => {
                return Err(DeskError::Other("no exchange client configured".to_string()))
            }
        };
        Ok(DeskClient {
            exchange: Arc::new(exchange),
            clock: self.clock,
            state: Arc::new(RwLock::new(DeskState::new(
                self.ticker_ttl,
                self.transient_delay,
            ))),
        })
    }
}
