//! The orchestrator: one serialized write path over the store aggregate.
//!
//! Every mutating operation becomes a command dispatched as one atomic
//! transaction: decide, apply, journal, publish, then run post-commit
//! transfers. Reads take the shared lock and observe a committed prefix of
//! mutations, never a partially-applied one.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use storeledger_accounting::Statistics;
use storeledger_auth::CallerId;
use storeledger_catalog::{Item, StockDirection};
use storeledger_core::{Aggregate, ItemId, OrderId, StoreError, StoreResult};
use storeledger_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use storeledger_orders::{Order, OrderStatus};

use crate::command::{
    AddItem, AdjustInventory, CancelOrder, PlaceOrder, SetDiscountPercentage, StoreCommand,
    ToggleSale, UpdateOrderStatus, UpdatePrice, UpdateShippingAddress, WithdrawFunds,
};
use crate::event::StoreEvent;
use crate::store::Store;
use crate::transfer::{NoopTransfers, TransferPort};

#[derive(Debug)]
struct EngineState {
    store: Store,
    journal: Vec<EventEnvelope<StoreEvent>>,
    next_sequence: u64,
}

/// Single entry point for all store operations.
///
/// Generic over the event bus and the transfer port so tests can wire
/// in-memory implementations and hosts can swap in real backends.
#[derive(Debug)]
pub struct StoreEngine<B, T> {
    state: RwLock<EngineState>,
    bus: B,
    transfers: T,
}

impl StoreEngine<Arc<InMemoryEventBus<EventEnvelope<StoreEvent>>>, NoopTransfers> {
    /// Engine wired with an in-memory bus and no-op transfers.
    pub fn in_memory(merchant: CallerId) -> Self {
        Self::new(merchant, Arc::new(InMemoryEventBus::new()), NoopTransfers)
    }
}

impl<B, T> StoreEngine<B, T>
where
    B: EventBus<EventEnvelope<StoreEvent>>,
    T: TransferPort,
{
    pub fn new(merchant: CallerId, bus: B, transfers: T) -> Self {
        Self {
            state: RwLock::new(EngineState {
                store: Store::new(merchant),
                journal: Vec::new(),
                next_sequence: 1,
            }),
            bus,
            transfers,
        }
    }

    pub fn merchant(&self) -> CallerId {
        self.read(|store| store.merchant())
    }

    /// Subscribe to committed events.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<StoreEvent>> {
        self.bus.subscribe()
    }

    /// The committed journal, in commit order.
    pub fn journal(&self) -> Vec<EventEnvelope<StoreEvent>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.journal.clone()
    }

    // ── mutating operations ──────────────────────────────────────────────

    pub fn add_item(
        &self,
        caller: CallerId,
        name: impl Into<String>,
        detail_uri: impl Into<String>,
        price: u64,
        initial_qty: u64,
    ) -> StoreResult<ItemId> {
        let events = self.dispatch(StoreCommand::AddItem(AddItem {
            caller,
            name: name.into(),
            detail_uri: detail_uri.into(),
            price,
            initial_qty,
            occurred_at: Utc::now(),
        }))?;
        match events.as_slice() {
            [StoreEvent::ItemAdded(e)] => Ok(e.item.id_typed()),
            _ => Err(StoreError::invalid_state("add item committed no item")),
        }
    }

    pub fn update_price(&self, caller: CallerId, item_id: ItemId, price: u64) -> StoreResult<()> {
        self.dispatch(StoreCommand::UpdatePrice(UpdatePrice {
            caller,
            item_id,
            price,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn increase_inventory(
        &self,
        caller: CallerId,
        item_id: ItemId,
        quantity: u64,
    ) -> StoreResult<()> {
        self.adjust_inventory(caller, item_id, StockDirection::Increase, quantity)
    }

    pub fn decrease_inventory(
        &self,
        caller: CallerId,
        item_id: ItemId,
        quantity: u64,
    ) -> StoreResult<()> {
        self.adjust_inventory(caller, item_id, StockDirection::Decrease, quantity)
    }

    fn adjust_inventory(
        &self,
        caller: CallerId,
        item_id: ItemId,
        direction: StockDirection,
        quantity: u64,
    ) -> StoreResult<()> {
        self.dispatch(StoreCommand::AdjustInventory(AdjustInventory {
            caller,
            item_id,
            direction,
            quantity,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Place an order over parallel item/quantity lists. Returns the
    /// assigned order id.
    pub fn place_order(
        &self,
        caller: CallerId,
        item_ids: Vec<ItemId>,
        quantities: Vec<u64>,
        paid_amount: u64,
    ) -> StoreResult<OrderId> {
        let events = self.dispatch(StoreCommand::PlaceOrder(PlaceOrder {
            caller,
            item_ids,
            quantities,
            paid_amount,
            occurred_at: Utc::now(),
        }))?;
        match events.as_slice() {
            [StoreEvent::OrderPlaced(e)] => Ok(e.order.id_typed()),
            _ => Err(StoreError::invalid_state("order placement committed no order")),
        }
    }

    pub fn cancel_order(&self, caller: CallerId, order_id: OrderId) -> StoreResult<()> {
        self.dispatch(StoreCommand::CancelOrder(CancelOrder {
            caller,
            order_id,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn update_status(
        &self,
        caller: CallerId,
        order_id: OrderId,
        status: OrderStatus,
    ) -> StoreResult<()> {
        self.dispatch(StoreCommand::UpdateOrderStatus(UpdateOrderStatus {
            caller,
            order_id,
            status,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn toggle_sale(&self, caller: CallerId) -> StoreResult<()> {
        self.dispatch(StoreCommand::ToggleSale(ToggleSale {
            caller,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn set_discount_percentage(&self, caller: CallerId, percentage: u8) -> StoreResult<()> {
        self.dispatch(StoreCommand::SetDiscountPercentage(SetDiscountPercentage {
            caller,
            percentage,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Withdraw the collected balance to the merchant's external account.
    /// Returns the amount withdrawn.
    pub fn withdraw_funds(&self, caller: CallerId) -> StoreResult<u64> {
        let events = self.dispatch(StoreCommand::WithdrawFunds(WithdrawFunds {
            caller,
            occurred_at: Utc::now(),
        }))?;
        match events.as_slice() {
            [StoreEvent::FundsWithdrawn(e)] => Ok(e.amount),
            _ => Err(StoreError::invalid_state("withdrawal committed no transfer")),
        }
    }

    pub fn update_shipping_address(
        &self,
        caller: CallerId,
        address: impl Into<String>,
    ) -> StoreResult<()> {
        self.dispatch(StoreCommand::UpdateShippingAddress(UpdateShippingAddress {
            caller,
            address: address.into(),
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    // ── read-only operations ─────────────────────────────────────────────

    pub fn item_detail(&self, item_id: ItemId) -> StoreResult<Item> {
        self.read(|store| store.item_detail(item_id))
    }

    pub fn order_detail(&self, order_id: OrderId) -> StoreResult<Order> {
        self.read(|store| store.order_detail(order_id))
    }

    /// The caller's own orders.
    pub fn orders_for_caller(&self, caller: CallerId) -> Vec<Order> {
        self.read(|store| store.orders_for(caller))
    }

    /// Merchant-only running totals.
    pub fn statistics(&self, caller: CallerId) -> StoreResult<Statistics> {
        self.read(|store| store.statistics(caller))
    }

    pub fn calculate_total(&self, item_ids: &[ItemId], quantities: &[u64]) -> StoreResult<u64> {
        self.read(|store| store.calculate_total(item_ids, quantities))
    }

    pub fn shipping_address(&self, caller: CallerId) -> Option<String> {
        self.read(|store| store.shipping_address(caller))
    }

    pub fn order_shipping_address(
        &self,
        caller: CallerId,
        order_id: OrderId,
    ) -> StoreResult<String> {
        self.read(|store| store.order_shipping_address(caller, order_id))
    }

    // ── dispatch pipeline ────────────────────────────────────────────────

    fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state.store)
    }

    /// Execute one command as an atomic transaction.
    ///
    /// Decision and state evolution happen under the write lock, so no
    /// other operation can observe an intermediate state. Publication and
    /// transfers run after commit; their failure never unwinds the state
    /// change.
    fn dispatch(&self, command: StoreCommand) -> StoreResult<Vec<StoreEvent>> {
        // A poisoned lock means a writer panicked; `apply` is infallible
        // over validated events, so the state itself is still consistent.
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        tracing::debug!(
            command = command.name(),
            caller = %command.caller(),
            "dispatching"
        );

        let events = state.store.handle(&command)?;

        let mut committed = Vec::with_capacity(events.len());
        for event in &events {
            state.store.apply(event);
            let envelope = EventEnvelope::new(
                Uuid::now_v7(),
                state.next_sequence,
                Utc::now(),
                event.clone(),
            );
            state.next_sequence += 1;
            state.journal.push(envelope.clone());
            committed.push(envelope);
        }
        drop(state);

        for envelope in committed {
            if let Err(err) = self.bus.publish(envelope) {
                tracing::warn!("event publication failed: {err:?}");
            }
        }

        self.run_transfers(&events);

        Ok(events)
    }

    fn run_transfers(&self, events: &[StoreEvent]) {
        for event in events {
            let (to, amount) = match event {
                StoreEvent::OrderCancelled(e) => (e.refunded_to, e.net_total),
                StoreEvent::FundsWithdrawn(e) => (e.recipient, e.amount),
                _ => continue,
            };
            if let Err(err) = self.transfers.credit(to, amount) {
                tracing::warn!("external transfer of {amount} to {to} failed: {err}");
            }
        }
    }
}
