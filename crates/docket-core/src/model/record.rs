//! The `Record` trait and the snapshot/patch machinery shared by every
//! registry record type.
//!
//! A *snapshot* is the full set of a record's field values at a point in
//! time, as a JSON object map. Snapshots are the common currency of the
//! audit diff and the filter view: every field is always present (absent
//! optionals serialize as `null`), so two snapshots of the same record type
//! always carry the same key set.
//!
//! A *patch* is a shallow merge: only the named fields are replaced,
//! everything else retains its prior value. Application goes
//! snapshot → merge → typed re-deserialization, so a patch that breaks the
//! record's shape is rejected as a [`ValidationError`] before anything
//! mutates.

use crate::error::ValidationError;
use crate::model::record_id::RecordId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The full field map of one record at a point in time.
pub type Snapshot = BTreeMap<String, Value>;

/// The five registry record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Award,
    Union,
    Member,
    Document,
    Workflow,
}

impl RecordKind {
    /// All record kinds in registry order.
    pub const ALL: [Self; 5] = [
        Self::Award,
        Self::Union,
        Self::Member,
        Self::Document,
        Self::Workflow,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::Union => "union",
            Self::Member => "member",
            Self::Document => "document",
            Self::Workflow => "workflow",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "award" => Ok(Self::Award),
            "union" => Ok(Self::Union),
            "member" => Ok(Self::Member),
            "document" => Ok(Self::Document),
            "workflow" => Ok(Self::Workflow),
            _ => Err(ParseEnumError {
                expected: "record kind",
                got: s.to_string(),
            }),
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// A registry record: a domain entity with a unique id and named fields.
///
/// Implemented by [`Award`](crate::model::award::Award),
/// [`Union`](crate::model::union::Union),
/// [`Member`](crate::model::member::Member),
/// [`Document`](crate::model::document::Document), and
/// [`Workflow`](crate::model::workflow::Workflow).
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The record's kind tag.
    const KIND: RecordKind;

    /// Field names the text search matches against, in display order.
    const SEARCH_FIELDS: &'static [&'static str];

    /// The field the date sort orders by (an ISO-8601 date string, so
    /// lexicographic order is chronological order).
    const DATE_FIELD: &'static str;

    /// The record's id. Empty on drafts that have not been created yet.
    fn id(&self) -> &RecordId;

    /// Set the id. Called exactly once, by `create`; ids never change
    /// afterwards (patches naming `id` are rejected).
    fn assign_id(&mut self, id: RecordId);

    /// Presence/shape checks, raised before any mutation or audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the offending field.
    fn validate(&self) -> Result<(), ValidationError>;

    /// The full field map, every field present (absent optionals as null).
    fn snapshot(&self) -> Snapshot {
        // Records are plain field structs; serializing one cannot fail and
        // always yields a JSON object.
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            Ok(_) | Err(_) => Snapshot::new(),
        }
    }
}

/// A shallow field patch: only the named fields are replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(BTreeMap<String, Value>);

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The patched field names, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Apply the patch to `record`, returning the updated copy.
    ///
    /// Shallow-merge semantics: named fields are replaced wholesale,
    /// unspecified fields retain their prior values. The merged snapshot is
    /// re-deserialized into the record type and re-validated, so the
    /// original is untouched on any failure.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ImmutableId`] when the patch names `id`.
    /// - [`ValidationError::UnknownField`] for a field the record does not
    ///   have.
    /// - [`ValidationError::InvalidShape`] when a value does not fit the
    ///   field's type.
    /// - Whatever [`Record::validate`] raises on the merged result.
    pub fn apply_to<R: Record>(&self, record: &R) -> Result<R, ValidationError> {
        if self.0.contains_key("id") {
            return Err(ValidationError::ImmutableId);
        }

        let mut snapshot = record.snapshot();
        for (field, value) in &self.0 {
            if !snapshot.contains_key(field) {
                return Err(ValidationError::UnknownField {
                    kind: R::KIND,
                    field: field.clone(),
                });
            }
            snapshot.insert(field.clone(), value.clone());
        }

        let merged = Value::Object(snapshot.into_iter().collect());
        let updated: R =
            serde_json::from_value(merged).map_err(|err| ValidationError::InvalidShape {
                kind: R::KIND,
                message: err.to_string(),
            })?;
        updated.validate()?;
        Ok(updated)
    }
}

impl FromIterator<(String, Value)> for Patch {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
