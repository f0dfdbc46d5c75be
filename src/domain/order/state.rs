//! Order state container — app-owned, SDK-provided update logic.

use super::{OrderRecord, OrderStatus, OrderUpdate};
use crate::shared::OrderId;
use std::collections::HashMap;

/// Every order the client has heard of, keyed by id.
///
/// Updates are merged last-writer-wins by server timestamp, not by arrival
/// order: an update is applied only if its timestamp is at least the stored
/// one, and ties go to the incoming update. Records are never removed and
/// status transitions are not validated.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    orders: HashMap<OrderId, OrderRecord>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `update` and return the record as it stands afterwards.
    ///
    /// An unknown id always creates a record, whatever its timestamp; without
    /// a status in the patch it starts as `PENDING_NEW`.
    pub fn apply(&mut self, update: OrderUpdate) -> &OrderRecord {
        let OrderUpdate {
            order_id,
            patch,
            server_timestamp,
        } = update;

        let record = self
            .orders
            .entry(order_id.clone())
            .or_insert_with(|| OrderRecord {
                id: order_id,
                status: OrderStatus::PendingNew,
                server_timestamp,
                fields: Default::default(),
            });

        if server_timestamp < record.server_timestamp {
            tracing::debug!(
                order_id = %record.id,
                stored = record.server_timestamp,
                incoming = server_timestamp,
                "Ignoring stale order update"
            );
            return record;
        }

        if let Some(status) = patch.status {
            record.status = status;
        }
        record.fields.extend(patch.fields);
        record.server_timestamp = server_timestamp;
        record
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&OrderRecord> {
        self.orders.get(order_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> {
        self.orders.values()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
