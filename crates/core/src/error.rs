//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the domain layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Domain-level error.
///
/// Every operation checks its preconditions before mutating anything; on
/// failure the operation aborts with one of these variants and state is left
/// untouched. Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A stock decrease would take an item's available quantity below zero.
    #[error(
        "insufficient inventory for item {item_id}: requested {requested}, available {available}"
    )]
    InsufficientInventory {
        item_id: ItemId,
        requested: u64,
        available: u64,
    },

    /// The amount tendered does not cover the order's gross total.
    #[error("insufficient payment: required {required}, paid {paid}")]
    InsufficientPayment { required: u64, paid: u64 },

    /// The caller is not permitted to perform this operation.
    #[error("unauthorized")]
    Unauthorized,

    /// An order status transition is not permitted from the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A requested item or order does not exist.
    #[error("not found")]
    NotFound,

    /// Structurally invalid input (e.g. mismatched item/quantity lists).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A value is outside its permitted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Checked-arithmetic failure on a monetary total.
    pub fn amount_overflow() -> Self {
        Self::InvalidArgument("monetary total overflows".to_string())
    }
}
