//! Wire types for order REST responses and pushed order updates.

use super::{OrderStatus, ServerTimestamp};
use crate::shared::OrderId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An order as the exchange API returns it.
///
/// Only `id` is required. `status` is optional because submit responses may
/// omit it; everything else is carried through untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderJson {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Server-pushed order change: the order plus its logical timestamp.
#[derive(Deserialize, Debug, Clone)]
pub struct ServerOrderUpdate {
    pub order: OrderJson,
    pub timestamp: ServerTimestamp,
}
