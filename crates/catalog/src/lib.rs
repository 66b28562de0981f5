//! Catalog domain module.
//!
//! This crate contains business rules for the merchant's item catalog,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod item;

pub use catalog::{Catalog, StockDirection};
pub use item::Item;
