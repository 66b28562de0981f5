//! Committed change notifications emitted by the store aggregate.
//!
//! One event per committed mutation; `apply` evolves state from these and
//! nothing else, so each event carries (or references) everything state
//! evolution needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeledger_auth::CallerId;
use storeledger_catalog::{Item, StockDirection};
use storeledger_core::{ItemId, OrderId};
use storeledger_events::Event;
use storeledger_orders::{Order, OrderStatus};

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: Item,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PriceUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub item_id: ItemId,
    pub price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InventoryAdjusted (merchant stock correction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAdjusted {
    pub item_id: ItemId,
    pub direction: StockDirection,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderPlaced.
///
/// Carries the full order so state evolution can reserve inventory, append
/// the order, and accrue the accounting totals from the event alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order: Order,
    pub paid_amount: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub refunded_to: CallerId,
    pub net_total: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdated {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleStarted {
    pub percentage: u8,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleEnded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEnded {
    pub occurred_at: DateTime<Utc>,
}

/// Event: DiscountPercentageSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPercentageSet {
    pub percentage: u8,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ShippingAddressUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddressUpdated {
    pub caller: CallerId,
    pub address: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub recipient: CallerId,
    pub amount: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    ItemAdded(ItemAdded),
    PriceUpdated(PriceUpdated),
    InventoryAdjusted(InventoryAdjusted),
    OrderPlaced(OrderPlaced),
    OrderCancelled(OrderCancelled),
    OrderStatusUpdated(OrderStatusUpdated),
    SaleStarted(SaleStarted),
    SaleEnded(SaleEnded),
    DiscountPercentageSet(DiscountPercentageSet),
    ShippingAddressUpdated(ShippingAddressUpdated),
    FundsWithdrawn(FundsWithdrawn),
}

impl Event for StoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::ItemAdded(_) => "catalog.item.added",
            StoreEvent::PriceUpdated(_) => "catalog.item.price_updated",
            StoreEvent::InventoryAdjusted(_) => "catalog.item.inventory_adjusted",
            StoreEvent::OrderPlaced(_) => "orders.order.placed",
            StoreEvent::OrderCancelled(_) => "orders.order.cancelled",
            StoreEvent::OrderStatusUpdated(_) => "orders.order.status_updated",
            StoreEvent::SaleStarted(_) => "sale.started",
            StoreEvent::SaleEnded(_) => "sale.ended",
            StoreEvent::DiscountPercentageSet(_) => "sale.discount_percentage_set",
            StoreEvent::ShippingAddressUpdated(_) => "shipping.address_updated",
            StoreEvent::FundsWithdrawn(_) => "funds.withdrawn",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::ItemAdded(e) => e.occurred_at,
            StoreEvent::PriceUpdated(e) => e.occurred_at,
            StoreEvent::InventoryAdjusted(e) => e.occurred_at,
            StoreEvent::OrderPlaced(e) => e.occurred_at,
            StoreEvent::OrderCancelled(e) => e.occurred_at,
            StoreEvent::OrderStatusUpdated(e) => e.occurred_at,
            StoreEvent::SaleStarted(e) => e.occurred_at,
            StoreEvent::SaleEnded(e) => e.occurred_at,
            StoreEvent::DiscountPercentageSet(e) => e.occurred_at,
            StoreEvent::ShippingAddressUpdated(e) => e.occurred_at,
            StoreEvent::FundsWithdrawn(e) => e.occurred_at,
        }
    }
}
