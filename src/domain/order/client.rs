//! Orders sub-client — submit, cancel, and server-update reconciliation.
//!
//! Submits and cancels are reflected in the order store before the server
//! has confirmed them, using the timestamp policy in [`super`]:
//!
//! - a submitted order is stored as `PENDING_NEW` at [`MIN_TIMESTAMP`], so
//!   the first real update for it wins;
//! - a cancelled order is stored as `PENDING_CANCEL` one past its last known
//!   timestamp, so it shows immediately but yields to the server's next word.
//!
//! A cancel is one-way. Its success response is ignored, and a failed cancel
//! is reported but not rolled back: the order stays `PENDING_CANCEL` until a
//! server update with an equal or later timestamp arrives.

use super::wire::{OrderJson, ServerOrderUpdate};
use super::{
    provisional_timestamp, NewOrder, OrderPatch, OrderRecord, OrderStatus, OrderUpdate,
    MIN_TIMESTAMP,
};
use crate::auth::{wrapped_request, AuthApi};
use crate::client::DeskClient;
use crate::clock::Clock;
use crate::error::ActionFailure;
use crate::exchange::ExchangeClient;
use crate::shared::{MarketSpec, OrderId};
use crate::store::Action;

/// Sub-client for order operations.
pub struct Orders<'a, X, C> {
    pub(crate) client: &'a DeskClient<X, C>,
}

impl<'a, X: ExchangeClient, C: Clock> Orders<'a, X, C> {
    /// Place an order. On success the returned order is stored as
    /// `PENDING_NEW` and its id returned; on failure the store is untouched,
    /// the error goes to the foreground channel, and `None` is returned.
    pub async fn submit_order<S: AuthApi + ?Sized>(
        &self,
        session: &S,
        exchange: &str,
        order: &NewOrder,
    ) -> Option<OrderId> {
        tracing::info!(
            exchange,
            side = %order.side,
            base = %order.base,
            counter = %order.counter,
            stop = order.is_stop(),
            "Submitting order"
        );
        let headers = session.headers();
        let api = &self.client.exchange;
        let action = wrapped_request(
            session,
            || api.submit_order(&headers, exchange, order),
            |resp| Some(Action::OrderUpdated(optimistic_submit(resp))),
            |err| Some(Action::SetForegroundError(ActionFailure::submit(&err).to_string())),
        )
        .await;

        let order_id = match &action {
            Some(Action::OrderUpdated(update)) => Some(update.order_id.clone()),
            _ => None,
        };
        if let Some(action) = action {
            self.client.dispatch(action).await;
        }
        order_id
    }

    /// [`Self::submit_order`] for a limit order.
    pub async fn submit_limit_order<S: AuthApi + ?Sized>(
        &self,
        session: &S,
        exchange: &str,
        order: &NewOrder,
    ) -> Option<OrderId> {
        self.submit_order(session, exchange, order).await
    }

    /// [`Self::submit_order`] for a stop order.
    pub async fn submit_stop_order<S: AuthApi + ?Sized>(
        &self,
        session: &S,
        exchange: &str,
        order: &NewOrder,
    ) -> Option<OrderId> {
        self.submit_order(session, exchange, order).await
    }

    /// Mark `order_id` as `PENDING_CANCEL` now, then ask the exchange to
    /// cancel it.
    ///
    /// An order the store has never seen is created as `PENDING_CANCEL` with
    /// a provisional timestamp of 1.
    pub async fn cancel_order<S: AuthApi + ?Sized>(
        &self,
        session: &S,
        coin: &MarketSpec,
        order_id: &OrderId,
    ) {
        {
            let now = self.client.clock.now();
            let mut state = self.client.state.write().await;
            let current = match state.order(order_id) {
                Some(record) => record.server_timestamp,
                None => {
                    tracing::warn!(%order_id, "Cancelling an order the store has not seen");
                    MIN_TIMESTAMP
                }
            };
            let update = OrderUpdate::new(
                order_id.clone(),
                OrderPatch::status(OrderStatus::PendingCancel),
                provisional_timestamp(current),
            );
            state.dispatch(Action::OrderUpdated(update), now);
        }

        tracing::info!(%order_id, market = %coin, "Cancelling order");
        let headers = session.headers();
        let api = &self.client.exchange;
        let action = wrapped_request(
            session,
            || api.cancel_order(&headers, coin, order_id),
            |()| None,
            |err| Some(Action::SetForegroundError(ActionFailure::cancel(&err).to_string())),
        )
        .await;

        if let Some(action) = action {
            self.client.dispatch(action).await;
        }
    }

    /// Merge a server-pushed order update and return the resulting record.
    pub async fn apply_server_update(&self, message: ServerOrderUpdate) -> Option<OrderRecord> {
        let update: OrderUpdate = message.into();
        let order_id = update.order_id.clone();
        let now = self.client.clock.now();
        let mut state = self.client.state.write().await;
        state.dispatch(Action::OrderUpdated(update), now);
        state.order(&order_id).cloned()
    }

    pub async fn get(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.client.order(order_id).await
    }
}

/// The store update for a freshly submitted order.
fn optimistic_submit(resp: OrderJson) -> OrderUpdate {
    OrderUpdate::new(
        resp.id,
        OrderPatch {
            status: Some(OrderStatus::PendingNew),
            fields: resp.rest,
        },
        MIN_TIMESTAMP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSession, Headers};
    use crate::client::DeskClientBuilder;
    use crate::clock::ManualClock;
    use crate::domain::ticker::wire::TickerResponse;
    use crate::error::{DeskError, HttpError};
    use crate::shared::Side;
    use rust_decimal::Decimal;
    use serde_json::{Map, Value};
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::time::Duration;

    /// Exchange stub that can inspect the shared store while a call is in flight.
    #[derive(Default)]
    struct StubExchange {
        submit_result: RefCell<Option<Result<OrderJson, DeskError>>>,
        cancel_result: RefCell<Option<Result<(), DeskError>>>,
        store_probe: RefCell<Option<Arc<async_lock::RwLock<crate::store::DeskState>>>>,
        seen_during_cancel: RefCell<Option<OrderRecord>>,
    }

    impl ExchangeClient for StubExchange {
        async fn fetch_ticker(
            &self,
            _headers: &Headers,
            _spec: &MarketSpec,
        ) -> Result<Option<TickerResponse>, DeskError> {
            Ok(None)
        }

        async fn submit_order(
            &self,
            _headers: &Headers,
            _exchange: &str,
            _order: &NewOrder,
        ) -> Result<OrderJson, DeskError> {
            self.submit_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(DeskError::Other("no result".to_string())))
        }

        async fn cancel_order(
            &self,
            _headers: &Headers,
            _coin: &MarketSpec,
            order_id: &OrderId,
        ) -> Result<(), DeskError> {
            let probe = self.store_probe.borrow().clone();
            if let Some(state) = probe {
                *self.seen_during_cancel.borrow_mut() = state.read().await.order(order_id).cloned();
            }
            self.cancel_result.borrow_mut().take().unwrap_or(Ok(()))
        }
    }

    fn client() -> (DeskClient<StubExchange, ManualClock>, ManualClock) {
        let clock = ManualClock::at_epoch();
        let client = DeskClientBuilder::new(StubExchange::default())
            .transient_delay(Duration::from_millis(5000))
            .clock(clock.clone())
            .build()
            .unwrap();
        *client.exchange.store_probe.borrow_mut() = Some(client.state.clone());
        (client, clock)
    }

    fn coin() -> MarketSpec {
        MarketSpec::new("binance", "BTC", "USDT")
    }

    fn order() -> NewOrder {
        NewOrder::limit("BTC", "USDT", Side::Bid, Decimal::from(1), Decimal::from(6000))
    }

    fn server_update(id: &str, status: &str, ts: i64) -> ServerOrderUpdate {
        serde_json::from_value(serde_json::json!({
            "order": { "id": id, "status": status },
            "timestamp": ts,
        }))
        .unwrap()
    }

    fn order_json(id: &str, status: &str) -> OrderJson {
        let mut rest = Map::new();
        rest.insert("limitPrice".to_string(), Value::from("6000"));
        OrderJson {
            id: OrderId::from(id),
            status: Some(OrderStatus::from(status)),
            rest,
        }
    }

    #[tokio::test]
    async fn test_cancel_is_visible_before_network_call() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        client.orders().apply_server_update(server_update("X", "OPEN", 5)).await;

        client.orders().cancel_order(&session, &coin(), &OrderId::from("X")).await;

        let seen = client.exchange.seen_during_cancel.borrow().clone().unwrap();
        assert_eq!(seen.status, OrderStatus::PendingCancel);
        assert_eq!(seen.server_timestamp, 6);
        let stored = client.orders().get(&OrderId::from("X")).await.unwrap();
        assert_eq!(stored.status, OrderStatus::PendingCancel);
        assert_eq!(stored.server_timestamp, 6);
    }

    #[tokio::test]
    async fn test_cancel_failure_reports_and_keeps_pending_cancel() {
        let (client, clock) = client();
        let session = AuthSession::cookie(None);
        client.orders().apply_server_update(server_update("X", "OPEN", 5)).await;
        *client.exchange.cancel_result.borrow_mut() =
            Some(Err(DeskError::Other("order already filled".to_string())));

        client.orders().cancel_order(&session, &coin(), &OrderId::from("X")).await;

        assert_eq!(
            client.foreground_error().await.as_deref(),
            Some("Could not cancel order: order already filled")
        );
        let stored = client.orders().get(&OrderId::from("X")).await.unwrap();
        assert_eq!(stored.status, OrderStatus::PendingCancel);

        clock.advance(Duration::from_millis(5000));
        assert_eq!(client.foreground_error().await, None);
    }

    #[tokio::test]
    async fn test_server_update_supersedes_pending_cancel() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        client.orders().apply_server_update(server_update("X", "OPEN", 5)).await;
        client.orders().cancel_order(&session, &coin(), &OrderId::from("X")).await;

        let stale = client.orders().apply_server_update(server_update("X", "OPEN", 5)).await;
        assert_eq!(stale.unwrap().status, OrderStatus::PendingCancel);

        let confirmed = client
            .orders()
            .apply_server_update(server_update("X", "CANCELED", 6))
            .await;
        assert_eq!(confirmed.unwrap().status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_creates_provisional_record() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        client.orders().cancel_order(&session, &coin(), &OrderId::from("ghost")).await;

        let stored = client.orders().get(&OrderId::from("ghost")).await.unwrap();
        assert_eq!(stored.status, OrderStatus::PendingCancel);
        assert_eq!(stored.server_timestamp, 1);
    }

    #[tokio::test]
    async fn test_submit_success_stores_pending_new() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        *client.exchange.submit_result.borrow_mut() = Some(Ok(order_json("Y", "OPEN")));

        let id = client.orders().submit_limit_order(&session, "binance", &order()).await;
        assert_eq!(id, Some(OrderId::from("Y")));

        let stored = client.orders().get(&OrderId::from("Y")).await.unwrap();
        assert_eq!(stored.status, OrderStatus::PendingNew);
        assert_eq!(stored.server_timestamp, MIN_TIMESTAMP);
        assert_eq!(stored.field("limitPrice"), Some(&Value::from("6000")));
    }

    #[tokio::test]
    async fn test_late_submit_response_does_not_clobber_confirmed_record() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        client
            .orders()
            .apply_server_update(server_update("Y", "FILLED", 1_530_000_000_000))
            .await;
        *client.exchange.submit_result.borrow_mut() = Some(Ok(order_json("Y", "OPEN")));

        client.orders().submit_stop_order(&session, "binance", &order()).await;

        let stored = client.orders().get(&OrderId::from("Y")).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Filled);
        assert_eq!(stored.server_timestamp, 1_530_000_000_000);
    }

    #[tokio::test]
    async fn test_submit_failure_reports_and_leaves_store_alone() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        *client.exchange.submit_result.borrow_mut() = Some(Err(DeskError::Http(
            HttpError::BadRequest("Insufficient balance".to_string()),
        )));

        let id = client.orders().submit_order(&session, "binance", &order()).await;
        assert_eq!(id, None);
        assert!(client.state().await.orders().is_empty());
        assert_eq!(
            client.foreground_error().await.as_deref(),
            Some("Could not submit order: HTTP error: Bad request: Insufficient balance")
        );
    }
}
