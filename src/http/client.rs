//! Low-level HTTP client — `DeskHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). No retries: a failed call is reported once and
//! the user decides whether to try again.

use crate::auth::Headers;
use crate::domain::order::wire::OrderJson;
use crate::domain::order::NewOrder;
use crate::domain::ticker::wire::TickerResponse;
use crate::error::{DeskError, HttpError};
use crate::exchange::ExchangeClient;
use crate::shared::{MarketSpec, OrderId};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Low-level HTTP client for the exchange REST API.
#[derive(Clone)]
pub struct DeskHttp {
    base_url: String,
    client: Client,
}

impl DeskHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── URLs ─────────────────────────────────────────────────────────────

    pub(crate) fn ticker_url(&self, spec: &MarketSpec) -> String {
        format!(
            "{}/api/exchanges/{}/markets/{}/ticker",
            self.base_url,
            urlencoding::encode(&spec.exchange),
            urlencoding::encode(&spec.pair())
        )
    }

    pub(crate) fn orders_url(&self, exchange: &str) -> String {
        format!(
            "{}/api/exchanges/{}/orders",
            self.base_url,
            urlencoding::encode(exchange)
        )
    }

    pub(crate) fn order_url(&self, coin: &MarketSpec, order_id: &OrderId) -> String {
        format!(
            "{}/api/exchanges/{}/markets/{}/orders/{}",
            self.base_url,
            urlencoding::encode(&coin.exchange),
            urlencoding::encode(&coin.pair()),
            urlencoding::encode(order_id.as_str())
        )
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str, headers: &Headers) -> Result<T, HttpError> {
        let resp = self.send(reqwest::Method::GET, url, headers, None::<&()>).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        headers: &Headers,
        body: &B,
    ) -> Result<T, HttpError> {
        let resp = self.send(reqwest::Method::POST, url, headers, Some(body)).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<(), HttpError> {
        self.send(reqwest::Method::DELETE, url, headers, None::<&()>)
            .await?;
        Ok(())
    }

    async fn send<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        headers: &Headers,
        body: Option<&B>,
    ) -> Result<reqwest::Response, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        // Browser: send the session cookie along with cross-origin requests.
        #[cfg(target_arch = "wasm32")]
        {
            req = req.fetch_credentials_include();
        }

        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        tracing::debug!("{} {}", method, url);
        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl ExchangeClient for DeskHttp {
    async fn fetch_ticker(
        &self,
        headers: &Headers,
        spec: &MarketSpec,
    ) -> Result<Option<TickerResponse>, DeskError> {
        Ok(self.get(&self.ticker_url(spec), headers).await?)
    }

    async fn submit_order(
        &self,
        headers: &Headers,
        exchange: &str,
        order: &NewOrder,
    ) -> Result<OrderJson, DeskError> {
        Ok(self.post(&self.orders_url(exchange), headers, order).await?)
    }

    async fn cancel_order(
        &self,
        headers: &Headers,
        coin: &MarketSpec,
        order_id: &OrderId,
    ) -> Result<(), DeskError> {
        Ok(self.delete(&self.order_url(coin, order_id), headers).await?)
    }
}
