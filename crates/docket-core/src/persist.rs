//! Persistence collaborator contract.
//!
//! The store consults its persistence collaborator *before* any in-memory
//! mutation becomes visible: a failed persist leaves the collection, the
//! audit log, and the selection untouched. Transports and storage formats
//! are the collaborator's concern, not the core's.

use crate::model::record::Record;
use crate::model::record_id::RecordId;
use std::collections::BTreeMap;
use std::fmt;

/// Error from a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PersistenceError {}

/// Durable storage for one record type.
pub trait Persistence<R: Record> {
    /// Load every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the backing store is unreadable.
    fn fetch_all(&self) -> Result<Vec<R>, PersistenceError>;

    /// Write one record (insert or replace by id).
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails; the store then
    /// aborts the operation with no visible mutation.
    fn persist(&mut self, record: &R) -> Result<(), PersistenceError>;

    /// Remove one record by id. Removing an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the removal fails.
    fn remove(&mut self, id: &RecordId) -> Result<(), PersistenceError>;
}

/// Keyed in-memory persistence: the reference implementation, used by tests
/// and by sessions that want store semantics without a durable backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence<R> {
    records: BTreeMap<RecordId, R>,
}

impl<R: Record> InMemoryPersistence<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }
}

impl<R: Record> Persistence<R> for InMemoryPersistence<R> {
    fn fetch_all(&self) -> Result<Vec<R>, PersistenceError> {
        Ok(self.records.values().cloned().collect())
    }

    fn persist(&mut self, record: &R) -> Result<(), PersistenceError> {
        self.records.insert(record.id().clone(), record.clone());
        Ok(())
    }

    fn remove(&mut self, id: &RecordId) -> Result<(), PersistenceError> {
        self.records.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryPersistence, Persistence};
    use crate::model::award::Award;
    use crate::model::record::Record;
    use crate::model::record_id::RecordId;

    #[test]
    fn upsert_and_remove() {
        let mut store: InMemoryPersistence<Award> = InMemoryPersistence::new();
        let mut award = Award {
            title: "Teachers Award 2024".into(),
            code: "AW-001".into(),
            union_name: "ATU".into(),
            ..Award::default()
        };
        award.assign_id(RecordId::new_unchecked("dk-a1"));

        store.persist(&award).expect("persist");
        assert_eq!(store.len(), 1);

        let replaced = Award {
            title: "Teachers Award 2025".into(),
            ..award.clone()
        };
        store.persist(&replaced).expect("persist");
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_all().expect("fetch")[0].title, "Teachers Award 2025");

        store.remove(&RecordId::new_unchecked("dk-a1")).expect("remove");
        assert!(store.is_empty());

        // Absent id removal is a no-op, not an error.
        store.remove(&RecordId::new_unchecked("dk-a1")).expect("remove");
    }
}
