use serde::{Deserialize, Serialize};

use storeledger_core::{StoreError, StoreResult};

use crate::CallerId;

/// Resolves whether a caller is the merchant.
///
/// The merchant identity is fixed at store construction; no operation in
/// the system elevates another caller. Checks are pure: no IO, no panics,
/// no business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    merchant: CallerId,
}

impl AccessControl {
    pub fn new(merchant: CallerId) -> Self {
        Self { merchant }
    }

    pub fn merchant(&self) -> CallerId {
        self.merchant
    }

    pub fn is_merchant(&self, caller: CallerId) -> bool {
        caller == self.merchant
    }

    /// Typed capability check used at the command boundary.
    pub fn ensure_merchant(&self, caller: CallerId) -> StoreResult<()> {
        if self.is_merchant(caller) {
            Ok(())
        } else {
            Err(StoreError::Unauthorized)
        }
    }
}
