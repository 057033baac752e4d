//! Application layer - drives the domain from the outside
//!
//! Hosts the simulated event source and UI poller that exercise a shared
//! session manager.

pub mod simulator;

pub use simulator::{next_command, PhoneCommand};
