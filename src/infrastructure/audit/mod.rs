/// Audit trail for call state changes
pub mod logger;

pub use logger::{AuditEntry, AuditLevel, AuditQuery, CallAuditLog};
