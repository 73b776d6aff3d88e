//! Union membership records.

use crate::error::ValidationError;
use crate::model::record::{ParseEnumError, Record, RecordKind};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
    Pending,
}

impl MemberStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }
}

impl Default for MemberStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseEnumError {
                expected: "member status",
                got: s.to_string(),
            }),
        }
    }
}

/// One person's membership of a registered union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Member {
    pub id: RecordId,
    /// Id of the union this membership belongs to.
    pub union_id: String,
    pub name: String,
    pub employee_id: String,
    pub position: String,
    /// Date the membership commenced (ISO-8601).
    pub joining_date: String,
    pub status: MemberStatus,
}

impl Record for Member {
    const KIND: RecordKind = RecordKind::Member;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "employee_id", "position"];
    const DATE_FIELD: &'static str = "joining_date";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("name", &self.name), ("union_id", &self.union_id)] {
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
