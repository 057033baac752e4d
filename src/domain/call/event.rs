//! Call domain events

use crate::domain::call::aggregate::Call;
use crate::domain::call::value_object::{CallLevel, CallState};
use crate::domain::shared::events::{DomainEvent, EventMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a state change means for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallEventKind {
    /// Call admitted into a slot
    Created,
    /// Inbound call answered or outbound call picked up
    Connected,
    Held,
    Resumed,
    /// Moved from the second slot to the first
    Promoted,
    /// Terminated or rejected
    Ended,
    /// Anything else (e.g. a forced state re-application)
    Changed,
}

/// A call changed state or slot during one manager command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub metadata: EventMetadata,
    /// Session-wide change order, starting at 1
    pub sequence: u64,
    pub call_id: u32,
    pub level: CallLevel,
    pub previous: CallState,
    pub current: CallState,
    pub active: bool,
}

impl CallEvent {
    pub fn new(call: &Call, previous: CallState, sequence: u64) -> Self {
        Self {
            metadata: EventMetadata::now(),
            sequence,
            call_id: call.id(),
            level: call.level(),
            previous,
            current: call.state(),
            active: call.is_active(),
        }
    }

    pub fn kind(&self) -> CallEventKind {
        use CallState::*;

        match (self.previous, self.current) {
            (Invalid, _) => CallEventKind::Created,
            (_, Idle) => CallEventKind::Ended,
            (Incoming | InSecondCall | Outgoing | OutSecondCall, Active) => {
                CallEventKind::Connected
            }
            (Active, HeldActive | HeldNoActive) => CallEventKind::Held,
            (HeldActive | HeldNoActive, Active) => CallEventKind::Resumed,
            (InSecondCall, Incoming) | (OutSecondCall, Outgoing) => CallEventKind::Promoted,
            _ => CallEventKind::Changed,
        }
    }
}

impl DomainEvent for CallEvent {
    fn event_type(&self) -> &'static str {
        match self.kind() {
            CallEventKind::Created => "call.created",
            CallEventKind::Connected => "call.connected",
            CallEventKind::Held => "call.held",
            CallEventKind::Resumed => "call.resumed",
            CallEventKind::Promoted => "call.promoted",
            CallEventKind::Ended => "call.ended",
            CallEventKind::Changed => "call.changed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata.occurred_at
    }

    fn call_id(&self) -> u32 {
        self.call_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::value_object::CallType;

    fn event(previous: CallState, current: CallState) -> CallEvent {
        CallEvent {
            metadata: EventMetadata::now(),
            sequence: 1,
            call_id: 1,
            level: CallLevel::First,
            previous,
            current,
            active: current == CallState::Active,
        }
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(event(CallState::Invalid, CallState::Incoming).kind(), CallEventKind::Created);
        assert_eq!(event(CallState::OutSecondCall, CallState::Active).kind(), CallEventKind::Connected);
        assert_eq!(event(CallState::Active, CallState::HeldNoActive).kind(), CallEventKind::Held);
        assert_eq!(event(CallState::HeldActive, CallState::Active).kind(), CallEventKind::Resumed);
        assert_eq!(event(CallState::InSecondCall, CallState::Incoming).kind(), CallEventKind::Promoted);
        assert_eq!(event(CallState::Incoming, CallState::Idle).kind(), CallEventKind::Ended);
    }

    #[test]
    fn test_event_from_call() {
        let mut call = Call::new(
            3,
            CallType::Inbound,
            "Bob".to_string(),
            "555-9876".to_string(),
            String::new(),
            CallLevel::First,
        );
        call.answer().unwrap();

        let event = CallEvent::new(&call, CallState::Incoming, 9);
        assert_eq!(event.call_id, 3);
        assert_eq!(event.sequence, 9);
        assert!(event.active);
        assert_eq!(event.event_type(), "call.connected");
    }
}
