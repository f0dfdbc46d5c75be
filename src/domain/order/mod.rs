//! Order domain — order records, optimistic updates, timestamp-ordered merge.

pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{OrderId, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

pub use state::OrderStore;

// ─── Timestamp policy ────────────────────────────────────────────────────────

/// Logical server timestamp: an ordering token within one order's update
/// stream, unrelated to wall-clock time.
pub type ServerTimestamp = i64;

/// Older than anything the server sends. An optimistic record stamped with it
/// is replaced by the first real update for the order.
pub const MIN_TIMESTAMP: ServerTimestamp = 0;

/// One past the latest known timestamp: wins against everything seen so far,
/// loses to the next server update that carries the same or a later value.
pub fn provisional_timestamp(current: ServerTimestamp) -> ServerTimestamp {
    current.saturating_add(1)
}

// ─── OrderStatus ─────────────────────────────────────────────────────────────

/// Order status as reported by the server.
///
/// The client itself only ever sets `PendingNew` and `PendingCancel`. Any
/// status string it does not recognize is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    PendingNew,
    Open,
    PartiallyFilled,
    Filled,
    PendingCancel,
    Cancelled,
    Rejected,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingNew => "PENDING_NEW",
            Self::Open => "OPEN",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::PendingCancel => "PENDING_CANCEL",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING_NEW" => Self::PendingNew,
            "OPEN" => Self::Open,
            "PARTIALLY_FILLED" => Self::PartiallyFilled,
            "FILLED" => Self::Filled,
            "PENDING_CANCEL" => Self::PendingCancel,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "REJECTED" => Self::Rejected,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(OrderStatus::from(s.as_str()))
    }
}

// ─── OrderRecord ─────────────────────────────────────────────────────────────

/// The client's view of one order.
///
/// Besides id, status and timestamp, whatever else the exchange reports
/// (amounts, prices, pair, ...) is kept as-is in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(rename = "serverTimestamp")]
    pub server_timestamp: ServerTimestamp,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OrderRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

// ─── OrderUpdate ─────────────────────────────────────────────────────────────

/// The part of a record an update carries. Absent parts are left as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub fields: Map<String, Value>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            fields: Map::new(),
        }
    }
}

/// One timestamped change to one order: the unit applied to [`OrderStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub order_id: OrderId,
    pub patch: OrderPatch,
    pub server_timestamp: ServerTimestamp,
}

impl OrderUpdate {
    pub fn new(order_id: OrderId, patch: OrderPatch, server_timestamp: ServerTimestamp) -> Self {
        Self {
            order_id,
            patch,
            server_timestamp,
        }
    }
}

// ─── NewOrder ────────────────────────────────────────────────────────────────

/// Limit or stop order — the payload of a submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub base: String,
    pub counter: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
}

impl NewOrder {
    pub fn limit(base: &str, counter: &str, side: Side, amount: Decimal, limit_price: Decimal) -> Self {
        Self {
            base: base.to_string(),
            counter: counter.to_string(),
            side,
            amount,
            limit_price: Some(limit_price),
            stop_price: None,
        }
    }

    /// Stop order; `limit_price` of `None` means stop-market.
    pub fn stop(
        base: &str,
        counter: &str,
        side: Side,
        amount: Decimal,
        stop_price: Decimal,
        limit_price: Option<Decimal>,
    ) -> Self {
        Self {
            base: base.to_string(),
            counter: counter.to_string(),
            side,
            amount,
            limit_price,
            stop_price: Some(stop_price),
        }
    }

    pub fn is_stop(&self) -> bool {
        self.stop_price.is_some()
    }
}
