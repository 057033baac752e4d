/// Audit trail of call state changes
use crate::domain::call::event::{CallEvent, CallEventKind};
use crate::domain::session::observer::SessionObserver;
use crate::domain::shared::events::DomainEvent;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{info, warn};

/// Audit event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditLevel {
    Info,
    Warning,
}

impl AuditLevel {
    /// Calls that end without ever connecting are worth a warning
    fn for_event(event: &CallEvent) -> Self {
        match event.kind() {
            CallEventKind::Ended if !event.previous.is_connected() => AuditLevel::Warning,
            _ => AuditLevel::Info,
        }
    }
}

/// Audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub level: AuditLevel,
    pub event_type: String,
    pub event: CallEvent,
}

impl AuditEntry {
    pub fn new(event: &CallEvent) -> Self {
        Self {
            level: AuditLevel::for_event(event),
            event_type: event.event_type().to_string(),
            event: event.clone(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.event.occurred_at()
    }
}

/// Query filters for audit searches
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub call_id: Option<u32>,
    pub kind: Option<CallEventKind>,
    pub level: Option<AuditLevel>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Bounded in-memory audit log kept in event sequence order, oldest
/// entries dropped first
pub struct CallAuditLog {
    entries: RwLock<VecDeque<AuditEntry>>,
    max_entries: usize,
}

impl CallAuditLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries,
        }
    }

    pub fn record(&self, event: &CallEvent) {
        let entry = AuditEntry::new(event);

        match entry.level {
            AuditLevel::Info => info!(
                call_id = event.call_id,
                "AUDIT: {} {} -> {} [{}]",
                entry.event_type,
                event.previous,
                event.current,
                event.metadata.event_id
            ),
            AuditLevel::Warning => warn!(
                call_id = event.call_id,
                "AUDIT: {} {} -> {} [{}]",
                entry.event_type,
                event.previous,
                event.current,
                event.metadata.event_id
            ),
        }

        // Events from concurrent commands may arrive out of order
        let mut entries = self.entries.write();
        let position = entries.partition_point(|e| e.event.sequence <= event.sequence);
        entries.insert(position, entry);
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
    }

    pub fn query(&self, filters: &AuditQuery) -> Vec<AuditEntry> {
        let entries = self.entries.read();
        let mut results: Vec<AuditEntry> = entries
            .iter()
            .filter(|entry| {
                if let Some(call_id) = filters.call_id {
                    if entry.event.call_id != call_id {
                        return false;
                    }
                }
                if let Some(kind) = filters.kind {
                    if entry.event.kind() != kind {
                        return false;
                    }
                }
                if let Some(level) = filters.level {
                    if entry.level != level {
                        return false;
                    }
                }
                if let Some(since) = filters.since {
                    if entry.timestamp() < since {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        if let Some(limit) = filters.limit {
            results.truncate(limit);
        }

        results
    }

    /// Last `count` entries, newest first
    pub fn recent(&self, count: usize) -> Vec<AuditEntry> {
        let entries = self.entries.read();
        entries.iter().rev().take(count).cloned().collect()
    }

    /// Every entry about one call, oldest first
    pub fn for_call(&self, call_id: u32) -> Vec<AuditEntry> {
        self.query(&AuditQuery {
            call_id: Some(call_id),
            ..Default::default()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionObserver for CallAuditLog {
    fn on_call_event(&self, event: &CallEvent) {
        self.record(event);
    }
}
