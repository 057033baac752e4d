//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Aggregates: the call and its transitions
//! - Value Objects: call state, type and slot level
//! - Domain Services: the dual-slot session manager
//! - Ports: the session observer
//! - Domain Events: call state changes

pub mod call;
pub mod session;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
