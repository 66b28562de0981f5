//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and defined entirely by their attribute
/// values: a line item of (item 3, qty 2, price 100) is the same line item
/// wherever it appears. To "modify" one, build a new one.
///
/// The bounds keep value objects cheap to copy, comparable by value, and
/// debuggable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
