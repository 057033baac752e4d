//! Call value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Call state
///
/// Variants are ordered by declaration only; the order carries no meaning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Never placed in a slot
    #[default]
    Invalid,
    /// Finished (terminated or rejected)
    Idle,
    /// Inbound call ringing in the first slot
    Incoming,
    /// Outbound call dialing from the first slot
    Outgoing,
    /// In conversation
    Active,
    /// Parked while holding the first slot
    HeldActive,
    /// Parked while holding the second slot
    HeldNoActive,
    /// Inbound call waiting in the second slot
    InSecondCall,
    /// Outbound call dialing from the second slot
    OutSecondCall,
}

impl CallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Invalid => "INVALID",
            CallState::Idle => "IDLE",
            CallState::Incoming => "INCOMING",
            CallState::Outgoing => "OUTGOING",
            CallState::Active => "ACTIVE",
            CallState::HeldActive => "HELDACTIVE",
            CallState::HeldNoActive => "HELDNOACTIVE",
            CallState::InSecondCall => "INSECONDCALL",
            CallState::OutSecondCall => "OUTSECONDCALL",
        }
    }

    /// A call in any state but `Invalid`/`Idle` occupies a slot.
    pub fn is_alive(&self) -> bool {
        !matches!(self, CallState::Invalid | CallState::Idle)
    }

    /// Inbound call not yet answered or rejected
    pub fn is_ringing(&self) -> bool {
        matches!(self, CallState::Incoming | CallState::InSecondCall)
    }

    /// Outbound call not yet picked up by the remote party
    pub fn is_dialing(&self) -> bool {
        matches!(self, CallState::Outgoing | CallState::OutSecondCall)
    }

    /// Parked by a hold toggle
    pub fn is_held(&self) -> bool {
        matches!(self, CallState::HeldActive | CallState::HeldNoActive)
    }

    /// Answered at some point and still up, whether talking or parked
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            CallState::Active | CallState::HeldActive | CallState::HeldNoActive
        )
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who started the call. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Unknown,
    /// Remote party called us
    Inbound,
    /// We called the remote party
    Outbound,
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallType::Unknown => f.write_str("unknown"),
            CallType::Inbound => f.write_str("inbound"),
            CallType::Outbound => f.write_str("outbound"),
        }
    }
}

/// Which manager slot a call currently occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallLevel {
    First,
    Second,
}

impl CallLevel {
    /// 1-based slot number
    pub fn slot_number(&self) -> u8 {
        match self {
            CallLevel::First => 1,
            CallLevel::Second => 2,
        }
    }
}

impl fmt::Display for CallLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot{}", self.slot_number())
    }
}
