use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeledger_auth::CallerId;
use storeledger_core::{Entity, ItemId, OrderId, StoreError, StoreResult, ValueObject};

/// Order status lifecycle.
///
/// The fulfilment states are ordered (`Accepted < Dispatched < Delivered`);
/// `Cancelled` is terminal and outside that progression. Eligibility rules
/// are expressed through the typed methods below rather than raw
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Accepted,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Merchant status updates follow the fulfilment chain one step at a
    /// time: `Accepted -> Dispatched -> Delivered`. Cancellation is not a
    /// merchant update.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Accepted, OrderStatus::Dispatched)
                | (OrderStatus::Dispatched, OrderStatus::Delivered)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            OrderStatus::Accepted => "accepted",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Order line: item, quantity, and the catalog price snapshotted at
/// placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: ItemId,
    pub quantity: u64,
    /// Unit price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl ValueObject for LineItem {}

/// Gross total of a set of lines, with no discount applied.
///
/// Checked arithmetic throughout: an overflowing total is an error, never a
/// wrapped amount.
pub fn gross_total(lines: &[LineItem]) -> StoreResult<u64> {
    lines.iter().try_fold(0u64, |acc, line| {
        let line_total = line
            .unit_price
            .checked_mul(line.quantity)
            .ok_or_else(StoreError::amount_overflow)?;
        acc.checked_add(line_total)
            .ok_or_else(StoreError::amount_overflow)
    })
}

/// A placed order.
///
/// Immutable except for `status`; the monetary fields always satisfy
/// `net_total = gross_total - discount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    placed_by: CallerId,
    lines: Vec<LineItem>,
    gross_total: u64,
    discount: u64,
    net_total: u64,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    /// The placer's shipping address as it stood at placement time.
    shipping_snapshot: String,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        placed_by: CallerId,
        lines: Vec<LineItem>,
        gross_total: u64,
        discount: u64,
        created_at: DateTime<Utc>,
        shipping_snapshot: String,
    ) -> Self {
        Self {
            id,
            placed_by,
            lines,
            gross_total,
            discount,
            net_total: gross_total - discount,
            created_at,
            status: OrderStatus::Accepted,
            shipping_snapshot,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn placed_by(&self) -> CallerId {
        self.placed_by
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn gross_total(&self) -> u64 {
        self.gross_total
    }

    pub fn discount(&self) -> u64 {
        self.discount
    }

    pub fn net_total(&self) -> u64 {
        self.net_total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn shipping_snapshot(&self) -> &str {
        &self.shipping_snapshot
    }

    /// Total units across all lines.
    pub fn units(&self) -> u64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cancellation requires the original placer and an order that has not
    /// yet been dispatched.
    pub fn ensure_cancelable_by(&self, caller: CallerId) -> StoreResult<()> {
        if self.placed_by != caller {
            return Err(StoreError::Unauthorized);
        }
        if self.status != OrderStatus::Accepted {
            return Err(StoreError::invalid_state(format!(
                "order {} is {} and can no longer be cancelled",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Merchant status updates must follow the fulfilment chain.
    pub fn ensure_can_advance_to(&self, next: OrderStatus) -> StoreResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(StoreError::invalid_state(format!(
                "order {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
