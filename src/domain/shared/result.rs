//! Result alias for call and session transitions

use super::error::DomainError;

/// `Err` from a transition means the call or session was left as it was.
pub type Result<T> = std::result::Result<T, DomainError>;
