//! The domain-agnostic event contract.

use chrono::{DateTime, Utc};

/// A committed change notification.
///
/// Events are facts: immutable, versioned for schema evolution, and only
/// ever appended. One event is emitted per committed state transition.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "orders.order.placed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
