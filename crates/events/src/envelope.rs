use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for a committed event.
///
/// This is the unit appended to the journal and published on the bus.
///
/// Notes:
/// - **Append-only**: `sequence` is monotonically increasing across the
///   whole journal; the order of sequence numbers is the commit order.
/// - `recorded_at` is commit time; the payload carries its own business
///   time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    /// Monotonically increasing position in the committed journal.
    sequence: u64,

    recorded_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, sequence: u64, recorded_at: DateTime<Utc>, payload: E) -> Self {
        Self {
            event_id,
            sequence,
            recorded_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
