//! Conversions: REST wire types → ticker domain types.

use super::wire;
use super::TickerSnapshot;

impl From<wire::TickerResponse> for TickerSnapshot {
    fn from(resp: wire::TickerResponse) -> Self {
        TickerSnapshot {
            ask: resp.ask,
            bid: resp.bid,
            last: resp.last,
            high: resp.high,
            low: resp.low,
            volume: resp.volume,
        }
    }
}
