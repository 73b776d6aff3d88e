//! docket-core: domain records, audited record store, and filtered views
//! for an industrial registrar's EDRMS.
//!
//! The crate is organized around three cooperating pieces:
//!
//! - [`store::RecordStore`] — the canonical in-memory collection for one
//!   record type, with create/update/remove/bulk operations.
//! - [`audit`] — the field-level diff recorder and the append-only log of
//!   every mutation.
//! - [`view`] — filter criteria and the derived display projection,
//!   including select-all semantics and selection pruning.
//!
//! Collaborator seams ([`persist::Persistence`], [`export::Exporter`]) keep
//! storage transports and artifact rendering out of the core.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::StoreError`] from store operations, with
//!   stable machine codes ([`error::ErrorCode`]); `anyhow::Result` at
//!   config/IO boundaries.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`); the core never
//!   prints as a substitute for error propagation.

pub mod audit;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod persist;
pub mod store;
pub mod view;

pub use audit::{AuditAction, AuditEntry, AuditLog, FieldChange, FieldComparators};
pub use error::{ErrorCode, StoreError, ValidationError};
pub use export::{ArtifactHandle, CsvExporter, ExportError, ExportFormat, Exporter};
pub use model::{ActorId, Patch, Record, RecordId, RecordKind, Snapshot};
pub use persist::{InMemoryPersistence, Persistence, PersistenceError};
pub use store::{BulkAction, BulkFailure, BulkOutcome, RecordStore};
pub use view::{DateSort, FilterCriteria, ViewState};
