//! # tradedesk
//!
//! Client-side state engine for a browser trading dashboard, for native and
//! WASM targets: a TTL-gated ticker cache, an order store reconciled by server
//! timestamp, and self-clearing transient UI state.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Clock, shared newtypes, domain state containers, transient state
//! 2. **Auth** — Session validity, request headers, the wrapped-request helper
//! 3. **Exchange API** — `ExchangeClient` trait; `DeskHttp` REST implementation
//! 4. **High-Level Client** — `DeskClient` with `tickers()` / `orders()` sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tradedesk::prelude::*;
//!
//! let client = DeskClient::builder().base_url("http://localhost:8080").build()?;
//! let session = AuthSession::bearer(token, None);
//!
//! client.tickers().request_fetch(&session, &MarketSpec::new("binance", "BTC", "USDT")).await;
//! client.orders().cancel_order(&session, &coin, &order_id).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Time source.
pub mod clock;

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Self-clearing values.
pub mod transient;

/// Foreground error channel.
pub mod foreground;

/// Owned state object and actions.
pub mod store;

/// Unified error types.
pub mod error;

/// Network URL constants and timing defaults.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: session handle, headers, wrapped requests.
pub mod auth;

// ── Layer 3: Exchange API ────────────────────────────────────────────────────

/// Exchange API trait.
pub mod exchange;

/// REST implementation of the exchange API.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `DeskClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes + time
    pub use crate::clock::{Clock, ManualClock, SystemClock, Timestamp};
    pub use crate::shared::{MarketSpec, OrderId, Side};

    // Domain types — ticker
    pub use crate::domain::ticker::{FetchOutcome, TickerCache, TickerSnapshot};

    // Domain types — order
    pub use crate::domain::order::wire::{OrderJson, ServerOrderUpdate};
    pub use crate::domain::order::{
        provisional_timestamp, NewOrder, OrderPatch, OrderRecord, OrderStatus, OrderStore,
        OrderUpdate, ServerTimestamp, MIN_TIMESTAMP,
    };

    // State + transient
    pub use crate::foreground::{ErrorChannel, ForegroundError};
    pub use crate::store::{Action, DeskState};
    pub use crate::transient::TransientState;

    // Errors
    pub use crate::error::{ActionFailure, AuthError, DeskError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_TICKER_TTL, DEFAULT_TRANSIENT_DELAY};

    // Auth
    pub use crate::auth::{wrapped_request, AuthApi, AuthSession, Headers};

    // Exchange + client
    pub use crate::client::{DeskClient, DeskClientBuilder, OrdersClient, TickersClient};
    pub use crate::exchange::ExchangeClient;
    #[cfg(feature = "http")]
    pub use crate::http::DeskHttp;
}
