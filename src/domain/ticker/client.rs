//! Tickers sub-client — TTL-gated fetch into the shared cache.

use super::{FetchOutcome, TickerSnapshot};
use crate::auth::{wrapped_request, AuthApi};
use crate::client::DeskClient;
use crate::clock::Clock;
use crate::error::ActionFailure;
use crate::exchange::ExchangeClient;
use crate::shared::MarketSpec;
use crate::store::Action;

/// Sub-client for ticker operations.
pub struct Tickers<'a, X, C> {
    pub(crate) client: &'a DeskClient<X, C>,
}

impl<'a, X: ExchangeClient, C: Clock> Tickers<'a, X, C> {
    /// Fetch the ticker for `spec` unless the session is invalid or the cache
    /// was refreshed less than one TTL ago.
    ///
    /// The completion is stamped with the time it arrives, not the time the
    /// request left. Concurrent fetches are not de-duplicated: whichever
    /// response completes last overwrites the snapshot. Failures only move the
    /// refresh stamp and are never shown to the user.
    pub async fn request_fetch<S: AuthApi + ?Sized>(
        &self,
        session: &S,
        spec: &MarketSpec,
    ) -> FetchOutcome {
        if let Err(err) = session.status_at(self.client.clock.now()) {
            tracing::debug!("ticker: not fetching {}, {}", spec, err);
            return FetchOutcome::NotAuthenticated;
        }

        if !self.should_fetch().await {
            tracing::debug!("ticker: cache hit for {}", spec);
            return FetchOutcome::CacheFresh;
        }
        tracing::debug!("ticker: cache miss for {}", spec);

        let headers = session.headers();
        let exchange = &self.client.exchange;
        let action = wrapped_request(
            session,
            || exchange.fetch_ticker(&headers, spec),
            |resp| {
                Some(Action::TickerFetched {
                    spec: spec.clone(),
                    snapshot: resp.map(TickerSnapshot::from),
                })
            },
            |err| {
                tracing::warn!("{}", ActionFailure::fetch(&err));
                Some(Action::TickerFetchFailed { spec: spec.clone() })
            },
        )
        .await;

        let outcome = match &action {
            Some(Action::TickerFetched {
                snapshot: Some(_), ..
            }) => FetchOutcome::Updated,
            _ => FetchOutcome::Failed,
        };
        if let Some(action) = action {
            self.client.dispatch(action).await;
        }
        outcome
    }

    /// Whether a fetch would be allowed right now.
    pub async fn should_fetch(&self) -> bool {
        let now = self.client.clock.now();
        self.client.state.read().await.tickers().should_fetch(now)
    }

    /// Cached snapshot for `spec` (all-unknown if never fetched).
    pub async fn get(&self, spec: &MarketSpec) -> TickerSnapshot {
        self.client.ticker(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSession, Headers};
    use crate::client::DeskClientBuilder;
    use crate::clock::ManualClock;
    use crate::domain::order::wire::OrderJson;
    use crate::domain::order::NewOrder;
    use crate::domain::ticker::wire::TickerResponse;
    use crate::error::{DeskError, HttpError};
    use crate::shared::OrderId;
    use rust_decimal::Decimal;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(60);

    /// Answers ticker fetches from a script, counting calls.
    #[derive(Default)]
    struct ScriptedTickers {
        responses: RefCell<VecDeque<Result<Option<TickerResponse>, DeskError>>>,
        calls: Cell<usize>,
        seen_headers: RefCell<Vec<Headers>>,
    }

    impl ScriptedTickers {
        fn push(&self, response: Result<Option<TickerResponse>, DeskError>) {
            self.responses.borrow_mut().push_back(response);
        }
    }

    impl ExchangeClient for ScriptedTickers {
        async fn fetch_ticker(
            &self,
            headers: &Headers,
            _spec: &MarketSpec,
        ) -> Result<Option<TickerResponse>, DeskError> {
            self.calls.set(self.calls.get() + 1);
            self.seen_headers.borrow_mut().push(headers.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(DeskError::Other("no scripted response".to_string())))
        }

        async fn submit_order(
            &self,
            _headers: &Headers,
            _exchange: &str,
            _order: &NewOrder,
        ) -> Result<OrderJson, DeskError> {
            Err(DeskError::Other("unused".to_string()))
        }

        async fn cancel_order(
            &self,
            _headers: &Headers,
            _coin: &MarketSpec,
            _order_id: &OrderId,
        ) -> Result<(), DeskError> {
            Err(DeskError::Other("unused".to_string()))
        }
    }

    fn client() -> (DeskClient<ScriptedTickers, ManualClock>, ManualClock) {
        let clock = ManualClock::at_epoch();
        let client = DeskClientBuilder::new(ScriptedTickers::default())
            .ticker_ttl(TTL)
            .clock(clock.clone())
            .build()
            .unwrap();
        (client, clock)
    }

    fn btc() -> MarketSpec {
        MarketSpec::new("binance", "BTC", "USDT")
    }

    fn ticker(ask: i64, bid: i64) -> TickerResponse {
        TickerResponse {
            ask: Some(Decimal::from(ask)),
            bid: Some(Decimal::from(bid)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_session_is_noop() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        session.invalidate();

        let outcome = client.tickers().request_fetch(&session, &btc()).await;
        assert_eq!(outcome, FetchOutcome::NotAuthenticated);
        assert_eq!(client.exchange.calls.get(), 0);
        assert!(client.state().await.tickers().last_refresh().is_none());
    }

    #[tokio::test]
    async fn test_session_expiry_follows_client_clock() {
        let (client, clock) = client();
        let session = AuthSession::bearer("tok", Some(clock.now() + chrono::Duration::seconds(30)));
        client.exchange.push(Ok(Some(ticker(101, 99))));

        let tickers = client.tickers();
        assert_eq!(tickers.request_fetch(&session, &btc()).await, FetchOutcome::Updated);

        clock.advance(TTL);
        assert_eq!(
            tickers.request_fetch(&session, &btc()).await,
            FetchOutcome::NotAuthenticated
        );
        assert_eq!(client.exchange.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_success_then_cache_hit_until_ttl() {
        let (client, clock) = client();
        let session = AuthSession::bearer("tok", None);
        client.exchange.push(Ok(Some(ticker(101, 99))));
        client.exchange.push(Ok(Some(ticker(105, 100))));

        let tickers = client.tickers();
        assert_eq!(tickers.request_fetch(&session, &btc()).await, FetchOutcome::Updated);
        assert_eq!(tickers.get(&btc()).await.ask, Some(Decimal::from(101)));

        clock.advance(TTL - Duration::from_millis(1));
        assert_eq!(tickers.request_fetch(&session, &btc()).await, FetchOutcome::CacheFresh);
        assert_eq!(client.exchange.calls.get(), 1);

        clock.advance(Duration::from_millis(1));
        assert_eq!(tickers.request_fetch(&session, &btc()).await, FetchOutcome::Updated);
        assert_eq!(tickers.get(&btc()).await.ask, Some(Decimal::from(105)));
        assert_eq!(
            client.exchange.seen_headers.borrow()[0].get("Authorization").map(String::as_str),
            Some("Bearer tok")
        );
    }

    #[tokio::test]
    async fn test_failure_is_silent_and_counts_against_ttl() {
        let (client, clock) = client();
        let session = AuthSession::cookie(None);
        client.exchange.push(Ok(Some(ticker(1, 2))));
        client
            .exchange
            .push(Err(DeskError::Http(HttpError::ServerError {
                status: 502,
                body: "bad gateway".to_string(),
            })));

        let tickers = client.tickers();
        tickers.request_fetch(&session, &btc()).await;
        clock.advance(TTL);
        let failed_at = clock.now();
        assert_eq!(tickers.request_fetch(&session, &btc()).await, FetchOutcome::Failed);

        assert_eq!(tickers.get(&btc()).await, TickerSnapshot::from(ticker(1, 2)));
        assert_eq!(client.state().await.tickers().last_refresh(), Some(failed_at));
        assert!(!tickers.should_fetch().await);
        assert_eq!(client.foreground_error().await, None);
    }

    #[tokio::test]
    async fn test_empty_body_only_moves_refresh_stamp() {
        let (client, _) = client();
        let session = AuthSession::cookie(None);
        client.exchange.push(Ok(None));

        let outcome = client.tickers().request_fetch(&session, &btc()).await;
        assert_eq!(outcome, FetchOutcome::Failed);
        let state = client.state().await;
        assert!(state.tickers().is_empty());
        assert!(state.tickers().last_refresh().is_some());
    }

    #[tokio::test]
    async fn test_unauthorized_response_invalidates_session() {
        let (client, clock) = client();
        let session = AuthSession::bearer("expired", None);
        client.exchange.push(Err(DeskError::Http(HttpError::Unauthorized)));

        client.tickers().request_fetch(&session, &btc()).await;
        clock.advance(TTL);
        let outcome = client.tickers().request_fetch(&session, &btc()).await;
        assert_eq!(outcome, FetchOutcome::NotAuthenticated);
        assert_eq!(client.exchange.calls.get(), 1);
    }
}
