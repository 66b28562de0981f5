//! The store aggregate: catalog + order ledger + sale engine + accounting
//! behind a single decision boundary.

use std::collections::BTreeMap;

use storeledger_accounting::{Accounting, Statistics};
use storeledger_auth::{AccessControl, CallerId};
use storeledger_catalog::{Catalog, Item, StockDirection};
use storeledger_core::{
    Aggregate, AggregateRoot, ItemId, OrderId, StoreError, StoreId, StoreResult,
};
use storeledger_orders::{gross_total, AddressBook, LineItem, Order, OrderBook, OrderStatus};
use storeledger_pricing::SaleEngine;

use crate::command::{
    AddItem, AdjustInventory, CancelOrder, PlaceOrder, SetDiscountPercentage, StoreCommand,
    ToggleSale, UpdateOrderStatus, UpdatePrice, UpdateShippingAddress, WithdrawFunds,
};
use crate::event::{
    DiscountPercentageSet, FundsWithdrawn, InventoryAdjusted, ItemAdded, OrderCancelled,
    OrderPlaced, OrderStatusUpdated, PriceUpdated, SaleEnded, SaleStarted,
    ShippingAddressUpdated, StoreEvent,
};

/// Aggregate root: the whole store.
///
/// `handle` checks authorization and every precondition without mutating
/// anything; `apply` evolves the composed components from validated events.
/// An operation that fails any check therefore leaves all state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    id: StoreId,
    access: AccessControl,
    catalog: Catalog,
    orders: OrderBook,
    sale: SaleEngine,
    accounting: Accounting,
    addresses: AddressBook,
    version: u64,
}

impl Store {
    pub fn new(merchant: CallerId) -> Self {
        Self::with_id(StoreId::new(), merchant)
    }

    pub fn with_id(id: StoreId, merchant: CallerId) -> Self {
        Self {
            id,
            access: AccessControl::new(merchant),
            catalog: Catalog::new(),
            orders: OrderBook::new(),
            sale: SaleEngine::new(),
            accounting: Accounting::new(),
            addresses: AddressBook::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> StoreId {
        self.id
    }

    pub fn merchant(&self) -> CallerId {
        self.access.merchant()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn sale(&self) -> &SaleEngine {
        &self.sale
    }

    pub fn accounting(&self) -> &Accounting {
        &self.accounting
    }

    // ── read-only operations ─────────────────────────────────────────────

    pub fn item_detail(&self, item_id: ItemId) -> StoreResult<Item> {
        self.catalog.ensure(item_id).cloned()
    }

    pub fn order_detail(&self, order_id: OrderId) -> StoreResult<Order> {
        self.orders.ensure(order_id).cloned()
    }

    /// The caller's own orders, in placement order.
    pub fn orders_for(&self, caller: CallerId) -> Vec<Order> {
        self.orders
            .orders_for(caller)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Merchant-only: the running totals.
    pub fn statistics(&self, caller: CallerId) -> StoreResult<Statistics> {
        self.access.ensure_merchant(caller)?;
        Ok(self.accounting.statistics())
    }

    /// The caller's own stored shipping address.
    pub fn shipping_address(&self, caller: CallerId) -> Option<String> {
        self.addresses.get(caller).map(str::to_string)
    }

    /// Merchant-only: the address snapshot captured when an order was
    /// placed.
    pub fn order_shipping_address(
        &self,
        caller: CallerId,
        order_id: OrderId,
    ) -> StoreResult<String> {
        self.access.ensure_merchant(caller)?;
        let order = self.orders.ensure(order_id)?;
        Ok(order.shipping_snapshot().to_string())
    }

    /// Pure price computation over parallel item/quantity lists: gross
    /// total, no discount (discounts are order-context-dependent).
    pub fn calculate_total(&self, item_ids: &[ItemId], quantities: &[u64]) -> StoreResult<u64> {
        let lines = self.lines_from(item_ids, quantities)?;
        gross_total(&lines)
    }

    // ── decision helpers ─────────────────────────────────────────────────

    fn lines_from(&self, item_ids: &[ItemId], quantities: &[u64]) -> StoreResult<Vec<LineItem>> {
        if item_ids.len() != quantities.len() {
            return Err(StoreError::malformed_input(format!(
                "item and quantity lists differ in length ({} vs {})",
                item_ids.len(),
                quantities.len()
            )));
        }

        item_ids
            .iter()
            .zip(quantities)
            .map(|(&item_id, &quantity)| {
                let item = self.catalog.ensure(item_id)?;
                Ok(LineItem {
                    item_id,
                    quantity,
                    unit_price: item.price(),
                })
            })
            .collect()
    }

    fn handle_add_item(&self, cmd: &AddItem) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;

        if cmd.name.trim().is_empty() {
            return Err(StoreError::invalid_argument("item name cannot be empty"));
        }

        let item = Item::new(
            self.catalog.next_id(),
            cmd.name.clone(),
            cmd.detail_uri.clone(),
            cmd.price,
            cmd.initial_qty,
        );

        Ok(vec![StoreEvent::ItemAdded(ItemAdded {
            item,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_price(&self, cmd: &UpdatePrice) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;
        self.catalog.ensure(cmd.item_id)?;

        Ok(vec![StoreEvent::PriceUpdated(PriceUpdated {
            item_id: cmd.item_id,
            price: cmd.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust_inventory(&self, cmd: &AdjustInventory) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;

        if cmd.quantity == 0 {
            return Err(StoreError::invalid_argument(
                "adjustment quantity must be positive",
            ));
        }

        match cmd.direction {
            StockDirection::Increase => {
                self.catalog.ensure(cmd.item_id)?;
            }
            StockDirection::Decrease => {
                self.catalog.ensure_available(cmd.item_id, cmd.quantity)?;
            }
        }

        Ok(vec![StoreEvent::InventoryAdjusted(InventoryAdjusted {
            item_id: cmd.item_id,
            direction: cmd.direction,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_place_order(&self, cmd: &PlaceOrder) -> StoreResult<Vec<StoreEvent>> {
        let lines = self.lines_from(&cmd.item_ids, &cmd.quantities)?;

        if lines.is_empty() {
            return Err(StoreError::malformed_input(
                "order must contain at least one line item",
            ));
        }
        if lines.iter().any(|l| l.quantity == 0) {
            return Err(StoreError::invalid_argument(
                "line quantities must be positive",
            ));
        }

        // Requirements are aggregated per item before the availability
        // check; two lines of the same item must not each pass alone.
        let mut required: BTreeMap<ItemId, u64> = BTreeMap::new();
        for line in &lines {
            let entry = required.entry(line.item_id).or_insert(0);
            *entry = entry.checked_add(line.quantity).ok_or_else(|| {
                StoreError::invalid_argument("requested quantity overflows")
            })?;
        }
        for (&item_id, &quantity) in &required {
            self.catalog.ensure_available(item_id, quantity)?;
        }

        let gross = gross_total(&lines)?;
        if cmd.paid_amount < gross {
            return Err(StoreError::InsufficientPayment {
                required: gross,
                paid: cmd.paid_amount,
            });
        }

        let discount = self.sale.discount_for(gross);

        let order = Order::new(
            self.orders.next_id(),
            cmd.caller,
            lines,
            gross,
            discount,
            cmd.occurred_at,
            self.addresses.snapshot_for(cmd.caller),
        );

        Ok(vec![StoreEvent::OrderPlaced(OrderPlaced {
            order,
            paid_amount: cmd.paid_amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel_order(&self, cmd: &CancelOrder) -> StoreResult<Vec<StoreEvent>> {
        let order = self.orders.ensure(cmd.order_id)?;
        order.ensure_cancelable_by(cmd.caller)?;

        Ok(vec![StoreEvent::OrderCancelled(OrderCancelled {
            order_id: cmd.order_id,
            refunded_to: cmd.caller,
            net_total: order.net_total(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_status(&self, cmd: &UpdateOrderStatus) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;
        let order = self.orders.ensure(cmd.order_id)?;
        order.ensure_can_advance_to(cmd.status)?;

        Ok(vec![StoreEvent::OrderStatusUpdated(OrderStatusUpdated {
            order_id: cmd.order_id,
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_toggle_sale(&self, cmd: &ToggleSale) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;

        let event = if self.sale.is_active() {
            StoreEvent::SaleEnded(SaleEnded {
                occurred_at: cmd.occurred_at,
            })
        } else {
            StoreEvent::SaleStarted(SaleStarted {
                percentage: self.sale.discount_percentage(),
                occurred_at: cmd.occurred_at,
            })
        };

        Ok(vec![event])
    }

    fn handle_set_discount(&self, cmd: &SetDiscountPercentage) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;
        SaleEngine::ensure_valid_percentage(cmd.percentage)?;

        Ok(vec![StoreEvent::DiscountPercentageSet(
            DiscountPercentageSet {
                percentage: cmd.percentage,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_withdraw(&self, cmd: &WithdrawFunds) -> StoreResult<Vec<StoreEvent>> {
        self.access.ensure_merchant(cmd.caller)?;

        Ok(vec![StoreEvent::FundsWithdrawn(FundsWithdrawn {
            recipient: cmd.caller,
            amount: self.accounting.balance(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_address(&self, cmd: &UpdateShippingAddress) -> StoreResult<Vec<StoreEvent>> {
        Ok(vec![StoreEvent::ShippingAddressUpdated(
            ShippingAddressUpdated {
                caller: cmd.caller,
                address: cmd.address.clone(),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn apply_order_cancelled(&mut self, event: &OrderCancelled) {
        let Some(order) = self.orders.get(event.order_id) else {
            return;
        };
        let lines = order.lines().to_vec();
        let units = order.units();
        let discount = order.discount();
        let net_total = order.net_total();

        for line in &lines {
            self.catalog
                .apply_adjustment(line.item_id, StockDirection::Increase, line.quantity);
        }
        self.orders.apply_status(event.order_id, OrderStatus::Cancelled);
        self.accounting.apply_cancellation(units, net_total, discount);
    }
}

impl AggregateRoot for Store {
    type Id = StoreId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Store {
    type Command = StoreCommand;
    type Event = StoreEvent;
    type Error = StoreError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StoreEvent::ItemAdded(e) => {
                self.catalog.apply_insert(e.item.clone());
            }
            StoreEvent::PriceUpdated(e) => {
                self.catalog.apply_price(e.item_id, e.price);
            }
            StoreEvent::InventoryAdjusted(e) => {
                self.catalog
                    .apply_adjustment(e.item_id, e.direction, e.quantity);
            }
            StoreEvent::OrderPlaced(e) => {
                for line in e.order.lines() {
                    self.catalog.apply_adjustment(
                        line.item_id,
                        StockDirection::Decrease,
                        line.quantity,
                    );
                }
                self.accounting.apply_placement(
                    e.order.units(),
                    e.order.net_total(),
                    e.order.discount(),
                    e.paid_amount,
                );
                self.orders.apply_insert(e.order.clone());
            }
            StoreEvent::OrderCancelled(e) => {
                self.apply_order_cancelled(e);
            }
            StoreEvent::OrderStatusUpdated(e) => {
                self.orders.apply_status(e.order_id, e.status);
            }
            StoreEvent::SaleStarted(_) => {
                self.sale.apply_started();
            }
            StoreEvent::SaleEnded(_) => {
                self.sale.apply_ended();
            }
            StoreEvent::DiscountPercentageSet(e) => {
                self.sale.apply_percentage(e.percentage);
            }
            StoreEvent::ShippingAddressUpdated(e) => {
                self.addresses.apply_update(e.caller, e.address.clone());
            }
            StoreEvent::FundsWithdrawn(e) => {
                self.accounting.apply_withdrawal(e.amount);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StoreCommand::AddItem(cmd) => self.handle_add_item(cmd),
            StoreCommand::UpdatePrice(cmd) => self.handle_update_price(cmd),
            StoreCommand::AdjustInventory(cmd) => self.handle_adjust_inventory(cmd),
            StoreCommand::PlaceOrder(cmd) => self.handle_place_order(cmd),
            StoreCommand::CancelOrder(cmd) => self.handle_cancel_order(cmd),
            StoreCommand::UpdateOrderStatus(cmd) => self.handle_update_status(cmd),
            StoreCommand::ToggleSale(cmd) => self.handle_toggle_sale(cmd),
            StoreCommand::SetDiscountPercentage(cmd) => self.handle_set_discount(cmd),
            StoreCommand::WithdrawFunds(cmd) => self.handle_withdraw(cmd),
            StoreCommand::UpdateShippingAddress(cmd) => self.handle_update_address(cmd),
        }
    }
}
