//! Dual-line call session manager
//!
//! Tracks at most two live calls: slot 1 holds the first (original) call,
//! slot 2 the second (waiting) call. All commands are advisory: a command
//! whose precondition does not hold leaves the session untouched and is
//! only reported in the debug log.
//!
//! Every command runs inside a single exclusive critical section, so a
//! call's state change and the slot reassignment it causes are observed
//! together. Queries take the shared lock and hand out copies.

use crate::domain::call::aggregate::Call;
use crate::domain::call::event::CallEvent;
use crate::domain::call::value_object::{CallLevel, CallState, CallType};
use crate::domain::session::directory::{Contact, ContactDirectory};
use crate::domain::session::observer::SessionObserver;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::events::DomainEvent;
use crate::domain::shared::result::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Consistent copy of both slots taken under one read lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub first: Option<Call>,
    pub second: Option<Call>,
    pub state: CallState,
}

impl SessionSnapshot {
    /// Calls in slot order
    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.first.iter().chain(self.second.iter())
    }

    pub fn active_count(&self) -> usize {
        self.calls().filter(|call| call.is_active()).count()
    }

    pub fn is_busy(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

/// Lock-protected session state
///
/// Calls live in `history`; the slots are indices into it, so a call in a
/// slot and its history entry are the same record.
#[derive(Debug)]
struct SessionInner {
    first: Option<usize>,
    second: Option<usize>,
    history: Vec<Call>,
    counter: u32,
    /// Last sequence number stamped on a call event
    sequence: u64,
    current_state: CallState,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            first: None,
            second: None,
            history: Vec::new(),
            counter: 0,
            sequence: 0,
            current_state: CallState::Invalid,
        }
    }

    fn slot_index(&self, level: CallLevel) -> Option<usize> {
        match level {
            CallLevel::First => self.first,
            CallLevel::Second => self.second,
        }
    }

    fn slot(&self, level: CallLevel) -> Option<&Call> {
        self.slot_index(level).map(|i| &self.history[i])
    }

    fn occupied(&self) -> Vec<usize> {
        self.first.into_iter().chain(self.second).collect()
    }

    fn is_busy(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// First slot call matching `pred`, slot 1 checked before slot 2
    fn find(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.occupied()
            .into_iter()
            .find(|&i| pred(&self.history[i]))
    }

    fn active_index(&self) -> Option<usize> {
        self.find(Call::is_active)
    }

    fn waiting_index(&self) -> Option<usize> {
        self.find(Call::is_alive)
    }

    fn incoming_index(&self) -> Option<usize> {
        self.find(Call::is_ringing)
    }

    fn dialing_index(&self) -> Option<usize> {
        self.find(|call| call.state().is_dialing())
    }

    fn admit(&mut self, call_type: CallType, contact: Contact) -> Result<()> {
        if self.is_busy() {
            return Err(DomainError::precondition("both slots are occupied"));
        }

        let level = if self.first.is_none() {
            CallLevel::First
        } else {
            CallLevel::Second
        };

        self.counter += 1;
        let call = Call::new(
            self.counter,
            call_type,
            contact.name,
            contact.number,
            contact.portrait,
            level,
        );
        self.current_state = call.state();
        self.history.push(call);

        let index = self.history.len() - 1;
        match level {
            CallLevel::First => self.first = Some(index),
            CallLevel::Second => self.second = Some(index),
        }
        Ok(())
    }

    fn answer(&mut self) -> Result<()> {
        if self.incoming_index().is_none() {
            return Err(DomainError::precondition("no incoming call to answer"));
        }

        // Put the current conversation on hold first
        if self.active_index().is_some() {
            self.switch_call()?;
        }

        let index = self
            .incoming_index()
            .ok_or_else(|| DomainError::precondition("incoming call vanished during hold"))?;
        let call = &mut self.history[index];
        call.answer()?;
        self.current_state = call.state();
        Ok(())
    }

    fn switch_call(&mut self) -> Result<()> {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            return Err(DomainError::precondition("switching needs two calls"));
        };

        let first_was_active = self.history[first].is_active();
        self.history[first].switch_side();
        self.history[second].switch_side();

        self.current_state = if first_was_active {
            self.history[first].state()
        } else {
            self.history[second].state()
        };
        Ok(())
    }

    fn reject(&mut self) -> Result<()> {
        let index = self
            .incoming_index()
            .ok_or_else(|| DomainError::precondition("no incoming call to reject"))?;

        let call = &mut self.history[index];
        call.reject()?;
        self.current_state = call.state();

        // Only an active call or another ringing call keeps a slot
        match (self.active_index(), self.incoming_index()) {
            (Some(keep), None) | (None, Some(keep)) => self.keep_only(keep),
            _ => self.clear_slots(),
        }
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        if let Some(index) = self.active_index() {
            let call = &mut self.history[index];
            call.terminate();
            self.current_state = call.state();
            self.settle();
            return Ok(());
        }

        // Hanging up a ringing call rejects it and drops everything else
        if let Some(index) = self.incoming_index() {
            let call = &mut self.history[index];
            call.reject()?;
            self.current_state = call.state();
            self.clear_slots();
            return Ok(());
        }

        // Cancel an outgoing call nobody picked up yet
        if let Some(index) = self.dialing_index() {
            let call = &mut self.history[index];
            call.terminate();
            self.current_state = call.state();
            self.settle();
            return Ok(());
        }

        Err(DomainError::precondition("no call to hang up"))
    }

    fn pickup(&mut self, slot: u8) -> Result<()> {
        let (level, other) = match slot {
            1 => (CallLevel::First, CallLevel::Second),
            2 => (CallLevel::Second, CallLevel::First),
            _ => return Err(DomainError::InvalidSlot(slot)),
        };

        let index = self
            .slot_index(level)
            .ok_or_else(|| DomainError::precondition(format!("slot {} is empty", slot)))?;

        let call = &self.history[index];
        if call.call_type() != CallType::Outbound || call.is_active() || !call.state().is_dialing() {
            return Err(DomainError::precondition(format!(
                "call {} in slot {} is not a dialing outbound call",
                call.id(),
                slot
            )));
        }

        // Only one conversation at a time
        if let Some(other_index) = self.slot_index(other) {
            if self.history[other_index].is_active() {
                self.history[other_index].switch_side();
            }
        }

        let call = &mut self.history[index];
        call.dial_answer()?;
        self.current_state = call.state();
        Ok(())
    }

    /// Drop finished calls from the slots and move the surviving call, if
    /// any, into slot 1.
    ///
    /// Only called right after one call ended, so at most one survivor
    /// exists.
    fn settle(&mut self) {
        match self.waiting_index() {
            Some(survivor) => self.keep_only(survivor),
            None => self.clear_slots(),
        }
    }

    /// Make `index` the only occupant, in slot 1
    fn keep_only(&mut self, index: usize) {
        let dropped: Vec<usize> = self.occupied().into_iter().filter(|&i| i != index).collect();
        for i in dropped {
            self.history[i].terminate();
        }

        let call = &mut self.history[index];
        call.promote_to_first();
        self.current_state = call.state();
        self.first = Some(index);
        self.second = None;
    }

    /// Empty both slots; calls still alive in them are hung up
    fn clear_slots(&mut self) {
        for index in self.occupied() {
            self.history[index].terminate();
        }
        self.first = None;
        self.second = None;
    }

    fn advance_clock(&mut self, secs: u64) {
        for index in self.occupied() {
            self.history[index].add_seconds(secs);
        }
    }
}

/// Owner of the two call slots and the call log
pub struct CallSessionManager {
    inner: RwLock<SessionInner>,
    directory: ContactDirectory,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl CallSessionManager {
    pub fn new() -> Self {
        Self::with_directory(ContactDirectory::default())
    }

    /// Manager whose generated calls pick their remote party from `directory`
    pub fn with_directory(directory: ContactDirectory) -> Self {
        Self {
            inner: RwLock::new(SessionInner::new()),
            directory,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer for call events
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.write().push(observer);
    }

    // Queries

    /// State of the call touched most recently
    pub fn state(&self) -> CallState {
        self.inner.read().current_state
    }

    /// Both slots occupied; new calls are refused
    pub fn is_busy(&self) -> bool {
        self.inner.read().is_busy()
    }

    /// Call currently in conversation
    pub fn active_call(&self) -> Option<Call> {
        let inner = self.inner.read();
        inner.active_index().map(|i| inner.history[i].clone())
    }

    /// First alive call
    pub fn waiting_call(&self) -> Option<Call> {
        let inner = self.inner.read();
        inner.waiting_index().map(|i| inner.history[i].clone())
    }

    /// First ringing inbound call
    pub fn incoming_call(&self) -> Option<Call> {
        let inner = self.inner.read();
        inner.incoming_index().map(|i| inner.history[i].clone())
    }

    /// Call in slot 1 or 2
    pub fn slot(&self, slot: u8) -> Option<Call> {
        let level = match slot {
            1 => CallLevel::First,
            2 => CallLevel::Second,
            _ => return None,
        };
        self.inner.read().slot(level).cloned()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();
        SessionSnapshot {
            first: inner.slot(CallLevel::First).cloned(),
            second: inner.slot(CallLevel::Second).cloned(),
            state: inner.current_state,
        }
    }

    /// Every call ever created, in creation order
    pub fn history(&self) -> Vec<Call> {
        self.inner.read().history.clone()
    }

    // Commands

    /// Simulate a call from a random directory contact
    pub fn generate_incoming(&self) {
        let contact = self.directory.pick();
        self.execute("generate_incoming", |inner| {
            inner.admit(CallType::Inbound, contact)
        });
    }

    /// Simulate dialing a random directory contact
    pub fn generate_outgoing(&self) {
        let contact = self.directory.pick();
        self.execute("generate_outgoing", |inner| {
            inner.admit(CallType::Outbound, contact)
        });
    }

    pub fn dial(&self, number: &str, name: &str) {
        let contact = Contact::new(name, number, "");
        self.execute("dial", |inner| inner.admit(CallType::Outbound, contact));
    }

    /// Answer the ringing call, holding the current conversation if any
    pub fn answer(&self) {
        self.execute("answer", SessionInner::answer);
    }

    /// Swap which of the two calls is on hold
    pub fn switch_call(&self) {
        self.execute("switch_call", SessionInner::switch_call);
    }

    pub fn reject(&self) {
        self.execute("reject", SessionInner::reject);
    }

    /// Hang up the conversation, or reject/cancel a call that never connected
    pub fn terminate(&self) {
        self.execute("terminate", SessionInner::terminate);
    }

    /// Remote party answered the outgoing call in `slot`
    pub fn pickup(&self, slot: u8) {
        if !(1..=2).contains(&slot) {
            warn!(slot, "pickup on a slot that does not exist");
        }
        self.execute("pickup", |inner| inner.pickup(slot));
    }

    /// Add `secs` to every connected call
    pub fn advance_clock(&self, secs: u64) {
        self.inner.write().advance_clock(secs);
    }

    // Diagnostics

    pub fn info_lines(&self) -> Vec<String> {
        self.snapshot().calls().map(|call| call.to_string()).collect()
    }

    pub fn history_lines(&self) -> Vec<String> {
        let inner = self.inner.read();
        inner.history.iter().map(|call| call.to_string()).collect()
    }

    pub fn print_info(&self) {
        let lines = self.info_lines();
        if lines.is_empty() {
            info!("no call in progress");
        }
        for line in lines {
            info!("{}", line);
        }
    }

    pub fn print_history(&self) {
        let lines = self.history_lines();
        info!("call history: {} calls", lines.len());
        for line in lines {
            info!("{}", line);
        }
    }

    /// Run one command under the write lock, then publish what changed.
    fn execute<F>(&self, command: &'static str, f: F)
    where
        F: FnOnce(&mut SessionInner) -> Result<()>,
    {
        let events = {
            let mut inner = self.inner.write();
            let before: Vec<(usize, CallState, CallLevel)> = inner
                .occupied()
                .into_iter()
                .map(|i| (i, inner.history[i].state(), inner.history[i].level()))
                .collect();
            let created_from = inner.history.len();

            if let Err(e) = f(&mut *inner) {
                debug!(command, error = %e, "command ignored");
            }

            let mut changes: Vec<(usize, CallState)> = before
                .into_iter()
                .filter(|&(i, state, level)| {
                    let call = &inner.history[i];
                    call.state() != state || call.level() != level
                })
                .map(|(i, state, _)| (i, state))
                .collect();
            changes.extend((created_from..inner.history.len()).map(|i| (i, CallState::Invalid)));

            // Stamped while the write lock is held, so sequence order is change order
            let mut events = Vec::with_capacity(changes.len());
            for (i, previous) in changes {
                inner.sequence += 1;
                events.push(CallEvent::new(&inner.history[i], previous, inner.sequence));
            }
            events
        };

        for event in &events {
            info!(
                command,
                seq = event.sequence,
                call_id = event.call_id,
                slot = %event.level,
                from = %event.previous,
                to = %event.current,
                "{}",
                event.event_type()
            );
        }
        self.notify(&events);
    }

    /// Delivery happens outside the write lock; concurrent commands may
    /// interleave here, observers order by `CallEvent::sequence`.
    fn notify(&self, events: &[CallEvent]) {
        if events.is_empty() {
            return;
        }
        let observers = self.observers.read().clone();
        for observer in &observers {
            for event in events {
                observer.on_call_event(event);
            }
        }
    }
}

impl Default for CallSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::event::CallEventKind;
    use crate::domain::session::observer::MockSessionObserver;
    use mockall::predicate::function;

    fn manager() -> CallSessionManager {
        CallSessionManager::with_directory(ContactDirectory::new(vec![Contact::new(
            "John Doe",
            "555-1234",
            "portrait1.jpg",
        )]))
    }

    #[test]
    fn test_generated_call_uses_directory() {
        let manager = manager();
        manager.generate_incoming();

        let call = manager.slot(1).unwrap();
        assert_eq!(call.name(), "John Doe");
        assert_eq!(call.number(), "555-1234");
        assert_eq!(call.portrait(), "portrait1.jpg");
        assert_eq!(call.id(), 1);
        assert_eq!(call.index(), 1);
    }

    #[test]
    fn test_slot_and_history_share_record() {
        let manager = manager();
        manager.generate_incoming();
        manager.answer();

        let history = manager.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], manager.slot(1).unwrap());
        assert_eq!(history[0].state(), CallState::Active);
    }

    #[test]
    fn test_settle_clears_when_nothing_survives() {
        let mut inner = SessionInner::new();
        inner.admit(CallType::Inbound, Contact::unknown()).unwrap();
        inner.history[0].terminate();
        inner.settle();

        assert!(inner.first.is_none());
        assert!(inner.second.is_none());
        assert_eq!(inner.history.len(), 1);
    }

    #[test]
    fn test_settle_promotes_second_slot() {
        let mut inner = SessionInner::new();
        inner.admit(CallType::Inbound, Contact::unknown()).unwrap();
        inner.admit(CallType::Outbound, Contact::unknown()).unwrap();
        assert_eq!(inner.history[1].state(), CallState::OutSecondCall);

        inner.history[0].terminate();
        inner.settle();

        assert_eq!(inner.first, Some(1));
        assert!(inner.second.is_none());
        assert_eq!(inner.history[1].state(), CallState::Outgoing);
        assert_eq!(inner.history[1].level(), CallLevel::First);
        assert_eq!(inner.current_state, CallState::Outgoing);
    }

    #[test]
    fn test_pickup_invalid_slot_is_ignored() {
        let mut inner = SessionInner::new();
        inner.admit(CallType::Outbound, Contact::unknown()).unwrap();
        assert_eq!(inner.pickup(3), Err(DomainError::InvalidSlot(3)));
        assert_eq!(inner.history[0].state(), CallState::Outgoing);
    }

    #[test]
    fn test_observer_sees_created_and_connected() {
        let manager = manager();
        let mut observer = MockSessionObserver::new();
        observer
            .expect_on_call_event()
            .with(function(|e: &CallEvent| e.kind() == CallEventKind::Created))
            .times(1)
            .return_const(());
        observer
            .expect_on_call_event()
            .with(function(|e: &CallEvent| e.kind() == CallEventKind::Connected))
            .times(1)
            .return_const(());
        manager.subscribe(Arc::new(observer));

        manager.generate_incoming();
        manager.answer();
    }

    #[test]
    fn test_observer_not_called_for_ignored_command() {
        let manager = manager();
        let mut observer = MockSessionObserver::new();
        observer.expect_on_call_event().times(0);
        manager.subscribe(Arc::new(observer));

        manager.answer();
        manager.reject();
        manager.switch_call();
        manager.terminate();
        manager.pickup(1);
    }

    #[test]
    fn test_observer_sees_hold_and_connect_on_answer_waiting() {
        let manager = manager();
        manager.generate_incoming();
        manager.answer();
        manager.generate_incoming();

        let mut observer = MockSessionObserver::new();
        observer
            .expect_on_call_event()
            .with(function(|e: &CallEvent| {
                e.call_id == 1 && e.kind() == CallEventKind::Held
            }))
            .times(1)
            .return_const(());
        observer
            .expect_on_call_event()
            .with(function(|e: &CallEvent| {
                e.call_id == 2 && e.kind() == CallEventKind::Connected
            }))
            .times(1)
            .return_const(());
        manager.subscribe(Arc::new(observer));

        manager.answer();
    }

    #[test]
    fn test_advance_clock() {
        let manager = manager();
        manager.generate_incoming();
        manager.advance_clock(3);
        assert_eq!(manager.slot(1).unwrap().seconds(), 0);

        manager.answer();
        manager.advance_clock(3);
        manager.advance_clock(2);
        assert_eq!(manager.slot(1).unwrap().seconds(), 5);
    }

    #[test]
    fn test_info_lines() {
        let manager = manager();
        assert!(manager.info_lines().is_empty());

        manager.generate_incoming();
        manager.generate_outgoing();
        let lines = manager.info_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INCOMING"));
        assert!(lines[1].contains("OUTSECONDCALL"));

        manager.print_info();
        manager.print_history();
        assert_eq!(manager.history_lines().len(), 2);
    }
}
