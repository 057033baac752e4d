//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The command does not apply to the current type/state/occupancy.
    /// State is left untouched whenever this is returned.
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    #[error("Invalid slot: {0} (expected 1 or 2)")]
    InvalidSlot(u8),
}

impl DomainError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        DomainError::PreconditionNotMet(msg.into())
    }
}
