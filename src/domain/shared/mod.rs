//! Shared kernel - Common types used across the call and session contexts

pub mod error;
pub mod events;
pub mod result;

pub use error::DomainError;
pub use events::{DomainEvent, EventMetadata};
pub use result::Result;
