//! Commands accepted by the store aggregate.
//!
//! Every command carries the caller identity (authorization happens at the
//! decision boundary, not before) and a business timestamp supplied by the
//! orchestrator, keeping the aggregate itself deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeledger_auth::CallerId;
use storeledger_catalog::StockDirection;
use storeledger_core::{ItemId, OrderId};
use storeledger_orders::OrderStatus;

/// Command: AddItem (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub caller: CallerId,
    pub name: String,
    pub detail_uri: String,
    pub price: u64,
    pub initial_qty: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdatePrice (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePrice {
    pub caller: CallerId,
    pub item_id: ItemId,
    pub price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustInventory (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustInventory {
    pub caller: CallerId,
    pub item_id: ItemId,
    pub direction: StockDirection,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PlaceOrder (any caller).
///
/// Items and quantities arrive as parallel lists; the aggregate validates
/// their shape before anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub caller: CallerId,
    pub item_ids: Vec<ItemId>,
    pub quantities: Vec<u64>,
    pub paid_amount: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder (order placer only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub caller: CallerId,
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateOrderStatus (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub caller: CallerId,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ToggleSale (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleSale {
    pub caller: CallerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetDiscountPercentage (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDiscountPercentage {
    pub caller: CallerId,
    pub percentage: u8,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawFunds (merchant-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFunds {
    pub caller: CallerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateShippingAddress (any caller, own entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateShippingAddress {
    pub caller: CallerId,
    pub address: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreCommand {
    AddItem(AddItem),
    UpdatePrice(UpdatePrice),
    AdjustInventory(AdjustInventory),
    PlaceOrder(PlaceOrder),
    CancelOrder(CancelOrder),
    UpdateOrderStatus(UpdateOrderStatus),
    ToggleSale(ToggleSale),
    SetDiscountPercentage(SetDiscountPercentage),
    WithdrawFunds(WithdrawFunds),
    UpdateShippingAddress(UpdateShippingAddress),
}

impl StoreCommand {
    /// The identity the command is executed on behalf of.
    pub fn caller(&self) -> CallerId {
        match self {
            StoreCommand::AddItem(c) => c.caller,
            StoreCommand::UpdatePrice(c) => c.caller,
            StoreCommand::AdjustInventory(c) => c.caller,
            StoreCommand::PlaceOrder(c) => c.caller,
            StoreCommand::CancelOrder(c) => c.caller,
            StoreCommand::UpdateOrderStatus(c) => c.caller,
            StoreCommand::ToggleSale(c) => c.caller,
            StoreCommand::SetDiscountPercentage(c) => c.caller,
            StoreCommand::WithdrawFunds(c) => c.caller,
            StoreCommand::UpdateShippingAddress(c) => c.caller,
        }
    }

    /// Stable command name, used for dispatch logging.
    pub fn name(&self) -> &'static str {
        match self {
            StoreCommand::AddItem(_) => "catalog.add_item",
            StoreCommand::UpdatePrice(_) => "catalog.update_price",
            StoreCommand::AdjustInventory(_) => "catalog.adjust_inventory",
            StoreCommand::PlaceOrder(_) => "orders.place_order",
            StoreCommand::CancelOrder(_) => "orders.cancel_order",
            StoreCommand::UpdateOrderStatus(_) => "orders.update_status",
            StoreCommand::ToggleSale(_) => "sale.toggle",
            StoreCommand::SetDiscountPercentage(_) => "sale.set_discount_percentage",
            StoreCommand::WithdrawFunds(_) => "funds.withdraw",
            StoreCommand::UpdateShippingAddress(_) => "shipping.update_address",
        }
    }
}
