//! Session observer port

use crate::domain::call::event::CallEvent;

/// Receives call events after each manager command.
///
/// Called outside the manager lock, so implementations may query the
/// manager again.
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver: Send + Sync {
    fn on_call_event(&self, event: &CallEvent);
}
