//! The exchange API the sub-clients talk to.
//!
//! [`crate::http::DeskHttp`] is the REST implementation; tests and embedders can
//! provide their own.

use crate::auth::Headers;
use crate::domain::order::wire::OrderJson;
use crate::domain::order::NewOrder;
use crate::domain::ticker::wire::TickerResponse;
use crate::error::DeskError;
use crate::shared::{MarketSpec, OrderId};

#[allow(async_fn_in_trait)]
pub trait ExchangeClient {
    /// Latest ticker for `spec`. `Ok(None)` when the server returns an empty body.
    async fn fetch_ticker(
        &self,
        headers: &Headers,
        spec: &MarketSpec,
    ) -> Result<Option<TickerResponse>, DeskError>;

    /// Place `order` on `exchange`; returns the order as the exchange recorded it.
    async fn submit_order(
        &self,
        headers: &Headers,
        exchange: &str,
        order: &NewOrder,
    ) -> Result<OrderJson, DeskError>;

    /// Cancel `order_id` on the market `coin`.
    async fn cancel_order(
        &self,
        headers: &Headers,
        coin: &MarketSpec,
        order_id: &OrderId,
    ) -> Result<(), DeskError>;
}
