//! Conversions: wire types → order updates.

use super::wire;
use super::{OrderPatch, OrderUpdate};

impl From<wire::OrderJson> for OrderPatch {
    fn from(order: wire::OrderJson) -> Self {
        OrderPatch {
            status: order.status,
            fields: order.rest,
        }
    }
}

impl From<wire::ServerOrderUpdate> for OrderUpdate {
    fn from(update: wire::ServerOrderUpdate) -> Self {
        let order_id = update.order.id.clone();
        OrderUpdate {
            order_id,
            patch: update.order.into(),
            server_timestamp: update.timestamp,
        }
    }
}
