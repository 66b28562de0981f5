use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use storeledger_auth::CallerId;

/// Per-caller shipping addresses, independent of any single order.
///
/// A snapshot of the caller's current address is copied into each order at
/// placement time; later address changes never touch existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AddressBook {
    entries: HashMap<CallerId, String>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, caller: CallerId) -> Option<&str> {
        self.entries.get(&caller).map(String::as_str)
    }

    /// The string copied into an order placed by `caller` right now.
    /// Callers without a stored address get an empty snapshot.
    pub fn snapshot_for(&self, caller: CallerId) -> String {
        self.entries.get(&caller).cloned().unwrap_or_default()
    }

    // ── state evolution (validated events only) ──────────────────────────

    pub fn apply_update(&mut self, caller: CallerId, address: String) {
        self.entries.insert(caller, address);
    }
}
