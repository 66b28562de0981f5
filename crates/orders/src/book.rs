use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use storeledger_auth::CallerId;
use storeledger_core::{OrderId, StoreError, StoreResult};

use crate::order::{Order, OrderStatus};

/// The append-only sequence of orders.
///
/// Orders are indexed two ways: a primary id -> position map (ids are
/// first-class keys, never storage-position arithmetic) and a secondary
/// per-caller index. Orders are never removed; cancellation only flips the
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    orders: Vec<Order>,
    index: HashMap<OrderId, usize>,
    by_caller: HashMap<CallerId, Vec<OrderId>>,
    next_id: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            index: HashMap::new(),
            by_caller: HashMap::new(),
            next_id: 1,
        }
    }

    /// The id the next placed order will receive.
    pub fn next_id(&self) -> OrderId {
        OrderId::new(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.index.get(&order_id).map(|&pos| &self.orders[pos])
    }

    pub fn ensure(&self, order_id: OrderId) -> StoreResult<&Order> {
        self.get(order_id).ok_or(StoreError::NotFound)
    }

    /// Orders placed by `caller`, in placement order.
    ///
    /// The secondary index is caller-scoped; a caller's list is never
    /// handed out for another identity.
    pub fn orders_for(&self, caller: CallerId) -> Vec<&Order> {
        self.by_caller
            .get(&caller)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    // ── state evolution (validated events only) ──────────────────────────

    pub fn apply_insert(&mut self, order: Order) {
        let id = order.id_typed();
        self.next_id = id.get() + 1;
        self.by_caller.entry(order.placed_by()).or_default().push(id);
        self.index.insert(id, self.orders.len());
        self.orders.push(order);
    }

    pub fn apply_status(&mut self, order_id: OrderId, status: OrderStatus) {
        if let Some(&pos) = self.index.get(&order_id) {
            self.orders[pos].set_status(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::LineItem;
    use chrono::Utc;
    use storeledger_core::ItemId;

    fn order(id: u64, placed_by: CallerId) -> Order {
        Order::new(
            OrderId::new(id),
            placed_by,
            vec![LineItem {
                item_id: ItemId::new(1),
                quantity: 1,
                unit_price: 100,
            }],
            100,
            0,
            Utc::now(),
            String::new(),
        )
    }

    #[test]
    fn ids_are_sequential_and_resolved_through_the_index() {
        let mut book = OrderBook::new();
        let caller = CallerId::new();
        assert_eq!(book.next_id(), OrderId::new(1));

        book.apply_insert(order(1, caller));
        book.apply_insert(order(2, caller));

        assert_eq!(book.next_id(), OrderId::new(3));
        assert_eq!(book.ensure(OrderId::new(2)).unwrap().id_typed(), OrderId::new(2));
        assert_eq!(book.ensure(OrderId::new(3)).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn caller_index_only_returns_that_callers_orders() {
        let mut book = OrderBook::new();
        let alice = CallerId::new();
        let bob = CallerId::new();

        book.apply_insert(order(1, alice));
        book.apply_insert(order(2, bob));
        book.apply_insert(order(3, alice));

        let mine: Vec<OrderId> = book.orders_for(alice).iter().map(|o| o.id_typed()).collect();
        assert_eq!(mine, vec![OrderId::new(1), OrderId::new(3)]);
        assert_eq!(book.orders_for(bob).len(), 1);
        assert!(book.orders_for(CallerId::new()).is_empty());
    }

    #[test]
    fn status_updates_reach_the_stored_order() {
        let mut book = OrderBook::new();
        let caller = CallerId::new();
        book.apply_insert(order(1, caller));

        book.apply_status(OrderId::new(1), OrderStatus::Dispatched);

        assert_eq!(
            book.ensure(OrderId::new(1)).unwrap().status(),
            OrderStatus::Dispatched
        );
    }
}
