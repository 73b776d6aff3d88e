//! Registered trade union records.

use crate::error::ValidationError;
use crate::model::record::{ParseEnumError, Record, RecordKind};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Union registration states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionStatus {
    Active,
    Inactive,
    Pending,
    PendingReview,
}

impl UnionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::PendingReview => "pending_review",
        }
    }
}

impl Default for UnionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for UnionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "pending_review" => Ok(Self::PendingReview),
            _ => Err(ParseEnumError {
                expected: "union status",
                got: s.to_string(),
            }),
        }
    }
}

/// A registered trade union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Union {
    pub id: RecordId,
    /// Register code, e.g. `TU-014`.
    pub code: String,
    pub name: String,
    pub abbreviation: String,
    /// Date entered in the register (ISO-8601).
    pub registered_date: String,
    pub status: UnionStatus,
    pub member_count: u32,
}

impl Record for Union {
    const KIND: RecordKind = RecordKind::Union;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "abbreviation"];
    const DATE_FIELD: &'static str = "registered_date";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("name", &self.name), ("code", &self.code)] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    kind: Self::KIND,
                    field,
                });
            }
        }
        Ok(())
    }
}
