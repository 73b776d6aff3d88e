//! The append-only audit log.

use crate::audit::{AuditAction, AuditEntry};
use crate::model::record_id::RecordId;
use std::collections::HashMap;

/// Insertion-ordered, append-only collection of audit entries.
///
/// The store is the only writer during normal operation; `append` is public
/// so persistence collaborators can rehydrate a log from disk. Entries are
/// indexed by entity id on the way in, which keeps per-record history
/// lookups cheap as the log grows.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    by_entity: HashMap<RecordId, Vec<usize>>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a log from previously persisted entries, preserving order.
    #[must_use]
    pub fn from_entries(entries: Vec<AuditEntry>) -> Self {
        let mut log = Self::new();
        for entry in entries {
            log.append(entry);
        }
        log
    }

    /// Append one entry. Entries are never modified or removed afterwards.
    pub fn append(&mut self, entry: AuditEntry) {
        if let Some(entity_id) = &entry.entity_id {
            self.by_entity
                .entry(entity_id.clone())
                .or_default()
                .push(self.entries.len());
        }
        self.entries.push(entry);
    }

    /// All entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// History for one record, in append order.
    #[must_use]
    pub fn for_entity(&self, id: &RecordId) -> Vec<&AuditEntry> {
        self.by_entity.get(id).map_or_else(Vec::new, |indices| {
            indices.iter().filter_map(|&i| self.entries.get(i)).collect()
        })
    }

    /// Entries for one action kind, in append order.
    pub fn by_action(&self, action: AuditAction) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(move |e| e.action == action)
    }
}
