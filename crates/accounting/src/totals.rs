use serde::{Deserialize, Serialize};

/// Snapshot of the merchant-facing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_items_sold: u64,
    pub total_sales: u64,
    pub discounts_given: u64,
}

/// Running aggregate totals plus the store's collected balance.
///
/// Invariant: `total_sales` equals the sum of net totals over all orders
/// whose status is not `Cancelled` at the current instant. Placement adds
/// a contribution, cancellation reverses it. The same holds for
/// `discounts_given` and `total_items_sold`.
///
/// `balance` is what the store has collected and not yet paid out: credited
/// with the full tendered amount at placement, debited by the net total on
/// refund and emptied by a merchant withdrawal. Refund and withdrawal
/// debits saturate, since the balance can legitimately be short at refund
/// time after a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accounting {
    total_items_sold: u64,
    total_sales: u64,
    discounts_given: u64,
    balance: u64,
}

impl Accounting {
    pub fn new() -> Self {
        Self {
            total_items_sold: 0,
            total_sales: 0,
            discounts_given: 0,
            balance: 0,
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_items_sold: self.total_items_sold,
            total_sales: self.total_sales,
            discounts_given: self.discounts_given,
        }
    }

    pub fn total_sales(&self) -> u64 {
        self.total_sales
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    // ── state evolution (validated events only) ──────────────────────────

    pub fn apply_placement(&mut self, units: u64, net_total: u64, discount: u64, paid: u64) {
        self.total_items_sold += units;
        self.total_sales += net_total;
        self.discounts_given += discount;
        self.balance += paid;
    }

    pub fn apply_cancellation(&mut self, units: u64, net_total: u64, discount: u64) {
        self.total_items_sold -= units;
        self.total_sales -= net_total;
        self.discounts_given -= discount;
        self.balance = self.balance.saturating_sub(net_total);
    }

    pub fn apply_withdrawal(&mut self, amount: u64) {
        self.balance = self.balance.saturating_sub(amount);
    }
}

impl Default for Accounting {
    fn default() -> Self {
        Self::new()
    }
}
