use serde::{Deserialize, Serialize};

use storeledger_core::{StoreError, StoreResult};

/// Sale state: on/off flag plus the discount percentage applied while on.
///
/// The percentage is bounded to `[0, 100]`; the bound is enforced when it
/// is set, so `discount_for` can assume a valid rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEngine {
    active: bool,
    discount_percentage: u8,
}

impl SaleEngine {
    pub fn new() -> Self {
        Self {
            active: false,
            discount_percentage: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn discount_percentage(&self) -> u8 {
        self.discount_percentage
    }

    pub fn ensure_valid_percentage(percentage: u8) -> StoreResult<()> {
        if percentage > 100 {
            return Err(StoreError::invalid_argument(format!(
                "discount percentage must be within [0, 100], got {percentage}"
            )));
        }
        Ok(())
    }

    /// Discount for a gross total at the current sale state.
    ///
    /// Integer division, truncating. Zero whenever the sale is off. The
    /// intermediate product is computed in u128 so it cannot overflow.
    pub fn discount_for(&self, gross_total: u64) -> u64 {
        if !self.active {
            return 0;
        }
        ((gross_total as u128 * self.discount_percentage as u128) / 100) as u64
    }

    // ── state evolution (validated events only) ──────────────────────────

    pub fn apply_started(&mut self) {
        self.active = true;
    }

    pub fn apply_ended(&mut self) {
        self.active = false;
    }

    pub fn apply_percentage(&mut self, percentage: u8) {
        self.discount_percentage = percentage;
    }
}

impl Default for SaleEngine {
    fn default() -> Self {
        Self::new()
    }
}
