//! Domain records for the registrar's registry.

pub mod award;
pub mod document;
pub mod member;
pub mod record;
pub mod record_id;
pub mod union;
pub mod workflow;

pub use record::{ParseEnumError, Patch, Record, RecordKind, Snapshot};
pub use record_id::{ActorId, InvalidRecordId, RecordId};
