use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storeledger_core::{ItemId, StoreError, StoreResult};

use crate::Item;

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Increase,
    Decrease,
}

/// The merchant's item catalog.
///
/// Owns every item exclusively; ids are assigned sequentially starting at 1
/// and resolved through the map, never by storage-position arithmetic.
///
/// Decision checks (`ensure*`) are pure and never mutate; the `apply_*`
/// methods evolve state from already-validated events and are infallible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: BTreeMap<ItemId, Item>,
    next_id: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// The id the next added item will receive.
    pub fn next_id(&self) -> ItemId {
        ItemId::new(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&Item> {
        self.items.get(&item_id)
    }

    pub fn ensure(&self, item_id: ItemId) -> StoreResult<&Item> {
        self.get(item_id).ok_or(StoreError::NotFound)
    }

    /// Check that `requested` units of an item can be reserved.
    ///
    /// A decrease that would take the quantity below zero is rejected
    /// outright, never clamped.
    pub fn ensure_available(&self, item_id: ItemId, requested: u64) -> StoreResult<&Item> {
        let item = self.ensure(item_id)?;
        if requested > item.available_qty() {
            return Err(StoreError::InsufficientInventory {
                item_id,
                requested,
                available: item.available_qty(),
            });
        }
        Ok(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    // ── state evolution (validated events only) ──────────────────────────

    pub fn apply_insert(&mut self, item: Item) {
        self.next_id = item.id_typed().get() + 1;
        self.items.insert(item.id_typed(), item);
    }

    pub fn apply_price(&mut self, item_id: ItemId, price: u64) {
        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_price(price);
        }
    }

    pub fn apply_adjustment(&mut self, item_id: ItemId, direction: StockDirection, quantity: u64) {
        if let Some(item) = self.items.get_mut(&item_id) {
            let qty = match direction {
                StockDirection::Increase => item.available_qty() + quantity,
                StockDirection::Decrease => item.available_qty() - quantity,
            };
            item.set_available_qty(qty);
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
