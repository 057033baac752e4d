//! Call aggregate root

use crate::domain::call::value_object::{CallLevel, CallState, CallType};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One call attempt on the phone
///
/// A call only changes through its own transition methods, which look at
/// nothing but the call's type, state and level. Locking is the session
/// manager's job; calls are only ever handed out as copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Session-unique id, assigned from the manager's counter
    id: u32,
    /// Creation order
    index: u32,
    call_type: CallType,
    /// Display name of the remote party
    name: String,
    /// Number of the remote party
    number: String,
    /// Portrait reference, opaque to the core
    portrait: String,
    /// Seconds spent connected
    seconds: u64,
    state: CallState,
    level: CallLevel,
    /// True while audio-connected
    active: bool,
}

impl Call {
    /// Create a call placed at `level`, in the ringing or dialing state
    /// matching its type and slot.
    pub(crate) fn new(
        id: u32,
        call_type: CallType,
        name: String,
        number: String,
        portrait: String,
        level: CallLevel,
    ) -> Self {
        let state = match (call_type, level) {
            (CallType::Inbound, CallLevel::First) => CallState::Incoming,
            (CallType::Inbound, CallLevel::Second) => CallState::InSecondCall,
            (CallType::Outbound, CallLevel::First) => CallState::Outgoing,
            (CallType::Outbound, CallLevel::Second) => CallState::OutSecondCall,
            (CallType::Unknown, _) => CallState::Invalid,
        };

        Self {
            id,
            index: id,
            call_type,
            name,
            number,
            portrait,
            seconds: 0,
            state,
            level,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Inbound call still waiting for answer or reject
    pub fn is_ringing(&self) -> bool {
        self.state.is_ringing()
    }

    /// Answer a ringing inbound call
    pub fn answer(&mut self) -> Result<()> {
        if self.call_type != CallType::Inbound {
            return Err(DomainError::precondition(format!(
                "call {} is {}, only inbound calls can be answered",
                self.id, self.call_type
            )));
        }
        if !self.state.is_ringing() {
            return Err(DomainError::precondition(format!(
                "call {} is {}, not ringing",
                self.id, self.state
            )));
        }

        self.state = CallState::Active;
        self.active = true;
        Ok(())
    }

    /// Remote party picked up our outbound call
    pub fn dial_answer(&mut self) -> Result<()> {
        if self.call_type != CallType::Outbound {
            return Err(DomainError::precondition(format!(
                "call {} is {}, only outbound calls can be picked up",
                self.id, self.call_type
            )));
        }
        if !self.state.is_dialing() {
            return Err(DomainError::precondition(format!(
                "call {} is {}, not dialing",
                self.id, self.state
            )));
        }

        self.state = CallState::Active;
        self.active = true;
        Ok(())
    }

    /// Toggle hold
    ///
    /// Active calls go on hold (the held state depends on the slot), ringing
    /// and dialing calls only lose the audio path, held calls resume.
    pub fn switch_side(&mut self) {
        match self.state {
            CallState::Active => {
                self.state = match self.level {
                    CallLevel::First => CallState::HeldActive,
                    CallLevel::Second => CallState::HeldNoActive,
                };
                self.active = false;
            }
            CallState::Incoming
            | CallState::InSecondCall
            | CallState::Outgoing
            | CallState::OutSecondCall => {
                self.active = false;
            }
            _ => {
                self.state = CallState::Active;
                self.active = true;
            }
        }
    }

    /// Decline a ringing inbound call
    pub fn reject(&mut self) -> Result<()> {
        if self.call_type != CallType::Inbound || !self.state.is_ringing() {
            return Err(DomainError::precondition(format!(
                "call {} ({}, {}) is not a ringing inbound call",
                self.id, self.call_type, self.state
            )));
        }

        self.state = CallState::Idle;
        self.active = false;
        Ok(())
    }

    /// Hang up, whatever the state
    pub fn terminate(&mut self) {
        self.state = CallState::Idle;
        self.active = false;
    }

    /// Move the call into the first slot after the other call left.
    ///
    /// Ringing and dialing calls take the first-slot flavour of their state,
    /// held calls resume.
    pub(crate) fn promote_to_first(&mut self) {
        self.level = CallLevel::First;
        match self.state {
            CallState::InSecondCall => self.state = CallState::Incoming,
            CallState::OutSecondCall => self.state = CallState::Outgoing,
            state if state.is_held() => self.switch_side(),
            _ => {}
        }
    }

    pub(crate) fn add_seconds(&mut self, secs: u64) {
        if self.state.is_connected() {
            self.seconds = self.seconds.saturating_add(secs);
        }
    }

    // Getters
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn call_type(&self) -> CallType {
        self.call_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn portrait(&self) -> &str {
        &self.portrait
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn level(&self) -> CallLevel {
        self.level
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "call {} [{}] type {}, name {}, number {}, portrait {}, state {}, seconds {}",
            self.id,
            self.level,
            self.call_type,
            self.name,
            self.number,
            self.portrait,
            self.state,
            self.seconds
        )
    }
}
