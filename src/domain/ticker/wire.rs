//! Wire types for the REST ticker endpoint.

use crate::shared::serde_util;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET /api/exchanges/{exchange}/markets/{base}-{counter}/ticker` body.
///
/// Fields the client does not use are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TickerResponse {
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub ask: Option<Decimal>,
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub bid: Option<Decimal>,
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub last: Option<Decimal>,
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub high: Option<Decimal>,
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub low: Option<Decimal>,
    #[serde(default, with = "serde_util::lenient_decimal")]
    pub volume: Option<Decimal>,
}
