use serde::{Deserialize, Serialize};

use storeledger_core::{Entity, ItemId};

/// A catalog entry.
///
/// Items are appended by the merchant and never deleted; only the price and
/// the available quantity change after creation (quantity may reach zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    detail_uri: String,
    /// Price in smallest currency unit (e.g., cents).
    price: u64,
    available_qty: u64,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        detail_uri: impl Into<String>,
        price: u64,
        available_qty: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            detail_uri: detail_uri.into(),
            price,
            available_qty,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail_uri(&self) -> &str {
        &self.detail_uri
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn available_qty(&self) -> u64 {
        self.available_qty
    }

    pub(crate) fn set_price(&mut self, price: u64) {
        self.price = price;
    }

    pub(crate) fn set_available_qty(&mut self, qty: u64) {
        self.available_qty = qty;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
