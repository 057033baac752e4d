//! Softphone - dual-line call session core
//!
//! A Domain-Driven Design (DDD) model of a handset that holds at most two
//! calls at once (an active call and a waiting call) and keeps them
//! consistent under concurrent commands and queries.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use domain::call::{Call, CallLevel, CallState, CallType};
pub use domain::session::CallSessionManager;
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
