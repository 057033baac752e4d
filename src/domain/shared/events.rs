//! Event plumbing shared by the call and session contexts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Something that happened to a call
pub trait DomainEvent: Send + Sync {
    /// Dotted name, e.g. `call.held`
    fn event_type(&self) -> &'static str;

    fn occurred_at(&self) -> DateTime<Utc>;

    /// Call the event is about
    fn call_id(&self) -> u32;
}

/// Identity and timestamp stamped on every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    pub fn now() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}
