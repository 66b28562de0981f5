//! `storeledger-engine` — the store aggregate and its orchestrator.
//!
//! The whole store (catalog + order ledger + sale engine + accounting) is
//! one aggregate behind one serialization boundary. `StoreEngine` is the
//! single entry point: it binds caller identity to operations, dispatches
//! each mutation as one atomic transaction, journals the committed events,
//! publishes them on the bus, and routes external value transfers.

pub mod command;
pub mod engine;
pub mod event;
pub mod store;
pub mod transfer;

pub use command::{
    AddItem, AdjustInventory, CancelOrder, PlaceOrder, SetDiscountPercentage, StoreCommand,
    ToggleSale, UpdateOrderStatus, UpdatePrice, UpdateShippingAddress, WithdrawFunds,
};
pub use engine::StoreEngine;
pub use event::{
    DiscountPercentageSet, FundsWithdrawn, InventoryAdjusted, ItemAdded, OrderCancelled,
    OrderPlaced, OrderStatusUpdated, PriceUpdated, SaleEnded, SaleStarted,
    ShippingAddressUpdated, StoreEvent,
};
pub use store::Store;
pub use transfer::{NoopTransfers, RecordingTransfers, Transfer, TransferError, TransferPort};
