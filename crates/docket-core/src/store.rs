//! The audited record store.
//!
//! One `RecordStore` owns the canonical in-memory collection for a single
//! record type, the audit log recording every mutation, and the selection
//! set used for bulk actions. It is the only component permitted to mutate
//! any of the three, which is what keeps them consistent: a removal prunes
//! the selection in the same logical step, and every mutating operation
//! appends exactly one audit entry.
//!
//! # Collaborators
//!
//! A persistence collaborator, when attached, is consulted *before* a
//! mutation becomes visible; if it fails, the operation aborts with nothing
//! changed. An export collaborator turns bulk-export requests into
//! artifacts; its failure rejects the export outright.
//!
//! # Ordering
//!
//! One store instance assumes a single active mutator (one session); audit
//! entries are appended in operation-completion order. Callers that need a
//! strict invocation-order trail across concurrent sessions must serialize
//! their mutations upstream.

use crate::audit::{
    AuditAction, AuditEntry, AuditLog, FieldComparators, diff_snapshots, wall_ts_us,
};
use crate::error::StoreError;
use crate::export::{ArtifactHandle, ExportFormat, Exporter};
use crate::model::record::{Patch, Record, Snapshot};
use crate::model::record_id::{ActorId, RecordId};
use crate::persist::Persistence;
use crate::view::{FilterCriteria, ViewState, visible_indices};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A bulk operation over a set of record ids.
///
/// Missing ids are tolerated (bulk actions race with single-item deletes in
/// richer deployments); per-id failures accumulate rather than aborting the
/// whole action.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    /// Remove every existing id.
    Delete { ids: Vec<RecordId> },
    /// Patch `status` on every existing id.
    StatusChange { ids: Vec<RecordId>, status: Value },
    /// Export the records for the ids; mutates nothing.
    Export {
        ids: Vec<RecordId>,
        format: ExportFormat,
    },
}

impl BulkAction {
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        match self {
            Self::Delete { ids } | Self::Export { ids, .. } | Self::StatusChange { ids, .. } => ids,
        }
    }

    #[must_use]
    const fn audit_action(&self) -> AuditAction {
        match self {
            Self::Delete { .. } => AuditAction::Delete,
            Self::StatusChange { .. } => AuditAction::StatusChange,
            Self::Export { .. } => AuditAction::Export,
        }
    }
}

/// One id's failure within a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BulkFailure {
    pub id: RecordId,
    pub error: String,
}

/// Outcome summary of a bulk action.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Ids the action was applied to, in request order.
    pub applied: Vec<RecordId>,
    /// Requested ids that were not present (tolerated, not an error).
    pub missing: Vec<RecordId>,
    /// Per-id failures. A collaborator failure abandons the ids after it;
    /// those appear in neither list.
    pub failed: Vec<BulkFailure>,
    /// The artifact, for export actions.
    pub artifact: Option<ArtifactHandle>,
}

/// Canonical in-memory collection, audit log, and selection for one record
/// type. See the module docs for the consistency rules.
pub struct RecordStore<R: Record> {
    records: Vec<R>,
    selection: BTreeSet<RecordId>,
    audit: AuditLog,
    comparators: FieldComparators,
    persistence: Option<Box<dyn Persistence<R>>>,
    exporter: Option<Box<dyn Exporter>>,
}

impl<R: Record> std::fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .field("selection", &self.selection)
            .field("audit", &self.audit)
            .field("comparators", &self.comparators)
            .field("persistence", &self.persistence.is_some())
            .field("exporter", &self.exporter.is_some())
            .finish()
    }
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    /// An empty store with no collaborators attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            selection: BTreeSet::new(),
            audit: AuditLog::new(),
            comparators: FieldComparators::new(),
            persistence: None,
            exporter: None,
        }
    }

    /// Build a store from previously loaded records and audit history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] when two records share an id —
    /// id uniqueness is the collection's core invariant and a vault that
    /// violates it needs repair, not silent acceptance.
    pub fn from_parts(records: Vec<R>, audit: AuditLog) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(record.id().clone()) {
                return Err(StoreError::DuplicateId {
                    kind: R::KIND,
                    id: record.id().clone(),
                });
            }
        }
        Ok(Self {
            records,
            selection: BTreeSet::new(),
            audit,
            comparators: FieldComparators::new(),
            persistence: None,
            exporter: None,
        })
    }

    /// Attach per-field diff comparators.
    #[must_use]
    pub fn with_comparators(mut self, comparators: FieldComparators) -> Self {
        self.comparators = comparators;
        self
    }

    /// Attach the persistence collaborator.
    #[must_use]
    pub fn with_persistence(mut self, persistence: Box<dyn Persistence<R>>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Attach the export collaborator.
    #[must_use]
    pub fn with_exporter(mut self, exporter: Box<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Attach the export collaborator to an already-built store.
    pub fn set_exporter(&mut self, exporter: Box<dyn Exporter>) {
        self.exporter = Some(exporter);
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.position(id).map(|pos| &self.records[pos])
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    /// The audit trail for this store.
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a record: validate, mint an id, persist, append, audit.
    ///
    /// The draft's id is ignored; a fresh unique id is always minted. The
    /// create audit entry compares every set field against the empty
    /// baseline.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] before anything mutates, or
    /// [`StoreError::Collaborator`] if persistence declines the write.
    pub fn create(&mut self, mut draft: R, actor: &ActorId) -> Result<R, StoreError> {
        draft.validate()?;
        let id = self.mint_unique_id();
        draft.assign_id(id.clone());

        self.persist_record(&draft)?;

        let changes = diff_snapshots(&Snapshot::new(), &draft.snapshot(), &self.comparators);
        self.records.push(draft.clone());
        self.push_entry(AuditAction::Create, Some(id.clone()), actor, changes);
        debug!(kind = %R::KIND, id = %id, "record created");
        Ok(draft)
    }

    /// Shallow-merge `patch` into the record with `id`.
    ///
    /// The audit entry contains exactly the fields whose value changed; an
    /// update that changes nothing still records an (empty-diff) entry.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`], [`StoreError::Validation`], or
    /// [`StoreError::Collaborator`]; in every case the record is untouched.
    pub fn update(&mut self, id: &RecordId, patch: &Patch, actor: &ActorId) -> Result<R, StoreError> {
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(R::KIND, id))?;

        let before = self.records[pos].snapshot();
        let updated = patch.apply_to(&self.records[pos])?;
        self.persist_record(&updated)?;

        let changes = diff_snapshots(&before, &updated.snapshot(), &self.comparators);
        self.records[pos] = updated.clone();
        self.push_entry(AuditAction::Update, Some(id.clone()), actor, changes);
        debug!(kind = %R::KIND, id = %id, fields = ?patch.fields().collect::<Vec<_>>(), "record updated");
        Ok(updated)
    }

    /// Remove the record with `id`, pruning it from the selection in the
    /// same logical step.
    ///
    /// The delete audit entry records the full prior snapshot as the old
    /// side of each field, which keeps history views reconstructable.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] or [`StoreError::Collaborator`].
    pub fn remove(&mut self, id: &RecordId, actor: &ActorId) -> Result<R, StoreError> {
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(R::KIND, id))?;

        self.persist_removal(id)?;

        let removed = self.records.remove(pos);
        self.selection.remove(id);
        let changes = diff_snapshots(&removed.snapshot(), &Snapshot::new(), &self.comparators);
        self.push_entry(AuditAction::Delete, Some(id.clone()), actor, changes);
        debug!(kind = %R::KIND, id = %id, "record removed");
        Ok(removed)
    }

    /// Apply a bulk action. One audit entry is recorded per bulk action
    /// (carrying the requested id list), regardless of per-id outcomes.
    ///
    /// # Errors
    ///
    /// Only export propagates an error (a failed export rejects the whole
    /// operation and records nothing). Delete and status-change report
    /// per-id results in the returned [`BulkOutcome`].
    pub fn bulk(&mut self, action: &BulkAction, actor: &ActorId) -> Result<BulkOutcome, StoreError> {
        let outcome = match action {
            BulkAction::Delete { ids } => self.bulk_delete(ids),
            BulkAction::StatusChange { ids, status } => self.bulk_status(ids, status),
            BulkAction::Export { ids, format } => self.bulk_export(ids, *format)?,
        };

        let ids_value = Value::from(
            action
                .ids()
                .iter()
                .map(|id| Value::from(id.as_str()))
                .collect::<Vec<_>>(),
        );
        let changes = diff_snapshots(
            &Snapshot::new(),
            &BTreeMap::from([(String::from("ids"), ids_value)]),
            &self.comparators,
        );
        self.push_entry(action.audit_action(), None, actor, changes);
        debug!(
            kind = %R::KIND,
            action = %action.audit_action(),
            applied = outcome.applied.len(),
            missing = outcome.missing.len(),
            failed = outcome.failed.len(),
            "bulk action finished"
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Mark a record for bulk action.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] — the selection never references an id the
    /// collection does not hold.
    pub fn select(&mut self, id: &RecordId) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::not_found(R::KIND, id));
        }
        self.selection.insert(id.clone());
        Ok(())
    }

    pub fn deselect(&mut self, id: &RecordId) {
        self.selection.remove(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    /// The selection as a sorted id list.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.iter().cloned().collect()
    }

    /// Select-all as a recomputation over the current filtered view: if
    /// every visible id is already selected, deselect the visible ids;
    /// otherwise select them. Ids hidden by the filter are never touched.
    pub fn toggle_select_all(&mut self, criteria: &FilterCriteria) {
        let visible: Vec<RecordId> = visible_indices(&self.records, criteria)
            .into_iter()
            .map(|i| self.records[i].id().clone())
            .collect();

        let all_selected =
            !visible.is_empty() && visible.iter().all(|id| self.selection.contains(id));

        if all_selected {
            for id in &visible {
                self.selection.remove(id);
            }
        } else {
            self.selection.extend(visible);
        }
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    /// Records passing `criteria`, in display order.
    #[must_use]
    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<&R> {
        visible_indices(&self.records, criteria)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// The display tuple for the UI layer: visible records, the selection,
    /// and the unfiltered total.
    #[must_use]
    pub fn view(&self, criteria: &FilterCriteria) -> ViewState<R> {
        ViewState {
            records: self.visible(criteria).into_iter().cloned().collect(),
            selected_ids: self.selected_ids(),
            total_count: self.records.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Mint an id that does not collide with any live record. The random
    /// suffix makes a collision vanishingly rare; the loop makes it
    /// impossible.
    fn mint_unique_id(&self) -> RecordId {
        loop {
            let id = RecordId::mint();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn persist_record(&mut self, record: &R) -> Result<(), StoreError> {
        if let Some(persistence) = self.persistence.as_mut() {
            persistence
                .persist(record)
                .map_err(|e| StoreError::collaborator("persistence", e.message))?;
        }
        Ok(())
    }

    fn persist_removal(&mut self, id: &RecordId) -> Result<(), StoreError> {
        if let Some(persistence) = self.persistence.as_mut() {
            persistence
                .remove(id)
                .map_err(|e| StoreError::collaborator("persistence", e.message))?;
        }
        Ok(())
    }

    fn push_entry(
        &mut self,
        action: AuditAction,
        entity_id: Option<RecordId>,
        actor: &ActorId,
        changes: BTreeMap<String, crate::audit::FieldChange>,
    ) {
        self.audit.append(AuditEntry {
            id: RecordId::mint(),
            action,
            entity_id,
            actor: actor.clone(),
            recorded_at_us: wall_ts_us(),
            changes,
        });
    }

    fn bulk_delete(&mut self, ids: &[RecordId]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for (n, id) in ids.iter().enumerate() {
            let Some(pos) = self.position(id) else {
                outcome.missing.push(id.clone());
                continue;
            };
            if let Err(err) = self.persist_removal(id) {
                // Collaborator failure: report this id, abandon the rest.
                outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error: err.to_string(),
                });
                debug!(kind = %R::KIND, abandoned = ids.len() - n - 1, "bulk delete aborted");
                break;
            }
            self.records.remove(pos);
            self.selection.remove(id);
            outcome.applied.push(id.clone());
        }
        outcome
    }

    fn bulk_status(&mut self, ids: &[RecordId], status: &Value) -> BulkOutcome {
        let patch = Patch::new().set("status", status.clone());
        let mut outcome = BulkOutcome::default();
        for (n, id) in ids.iter().enumerate() {
            let Some(pos) = self.position(id) else {
                outcome.missing.push(id.clone());
                continue;
            };
            let updated = match patch.apply_to(&self.records[pos]) {
                Ok(updated) => updated,
                Err(err) => {
                    // Validation failures are per-id: keep going.
                    outcome.failed.push(BulkFailure {
                        id: id.clone(),
                        error: err.to_string(),
                    });
                    continue;
                }
            };
            if let Err(err) = self.persist_record(&updated) {
                outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error: err.to_string(),
                });
                debug!(kind = %R::KIND, abandoned = ids.len() - n - 1, "bulk status change aborted");
                break;
            }
            self.records[pos] = updated;
            outcome.applied.push(id.clone());
        }
        outcome
    }

    fn bulk_export(&self, ids: &[RecordId], format: ExportFormat) -> Result<BulkOutcome, StoreError> {
        let exporter = self
            .exporter
            .as_deref()
            .ok_or_else(|| StoreError::collaborator("export", "no exporter attached"))?;

        let mut outcome = BulkOutcome::default();
        let mut rows = Vec::new();
        for id in ids {
            match self.get(id) {
                Some(record) => {
                    rows.push(record.snapshot());
                    outcome.applied.push(id.clone());
                }
                None => outcome.missing.push(id.clone()),
            }
        }

        let artifact = exporter
            .export(&rows, format)
            .map_err(|e| StoreError::collaborator("export", e.to_string()))?;
        outcome.artifact = Some(artifact);
        Ok(outcome)
    }
}
