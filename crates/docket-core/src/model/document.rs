//! Filed document records.
//!
//! Documents carry registry filing metadata only; the file content itself
//! lives with whatever stores the upload, not here.

use crate::error::ValidationError;
use crate::model::record::{Record, RecordKind};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};

/// Filing metadata for one document in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Document {
    pub id: RecordId,
    pub file_name: String,
    pub union_code: String,
    pub union_name: String,
    pub folder_code: String,
    pub folder_name: String,
    pub uploaded_by: String,
    /// Date the document was filed (ISO-8601).
    pub upload_date: String,
    /// Display size, e.g. `2.4 MB`.
    pub file_size: String,
    pub file_type: String,
}

impl Record for Document {
    const KIND: RecordKind = RecordKind::Document;
    const SEARCH_FIELDS: &'static [&'static str] = &["file_name", "union_name", "folder_name"];
    const DATE_FIELD: &'static str = "upload_date";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.file_name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                kind: Self::KIND,
                field: "file_name",
            });
        }
        Ok(())
    }
}
