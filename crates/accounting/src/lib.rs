//! Accounting module: running aggregate totals and the store balance.
//!
//! Pure domain logic only: no IO, no persistence concerns. All mutation
//! happens as a side effect of ledger transactions; there is no direct
//! external mutator.

pub mod totals;

pub use totals::{Accounting, Statistics};
