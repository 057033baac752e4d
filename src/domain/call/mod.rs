//! Call bounded context - a single call and its transitions

pub mod aggregate;
pub mod event;
pub mod value_object;

pub use aggregate::Call;
pub use event::{CallEvent, CallEventKind};
pub use value_object::{CallLevel, CallState, CallType};
