//! Industrial award records.
//!
//! An award is a registered industrial instrument: a wage determination or
//! collective agreement gazetted by the registrar. Field set follows the
//! registry's award register; dates are ISO-8601 strings so snapshots diff
//! and sort lexicographically.

use crate::error::ValidationError;
use crate::model::record::{ParseEnumError, Record, RecordKind};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three award instrument types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardType {
    /// Minimum Wages Board determination.
    Mwb,
    /// Public Service Conciliation and Arbitration award.
    Psca,
    /// Teaching Service Conciliation and Arbitration award.
    Tsca,
}

impl AwardType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mwb => "mwb",
            Self::Psca => "psca",
            Self::Tsca => "tsca",
        }
    }

    /// Long-form label for human-facing output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mwb => "Minimum Wages Board",
            Self::Psca => "Public Service Conciliation",
            Self::Tsca => "Teaching Service",
        }
    }
}

impl fmt::Display for AwardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AwardType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mwb" => Ok(Self::Mwb),
            "psca" => Ok(Self::Psca),
            "tsca" => Ok(Self::Tsca),
            _ => Err(ParseEnumError {
                expected: "award type",
                got: s.to_string(),
            }),
        }
    }
}

/// Award lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardStatus {
    Active,
    Expired,
    Draft,
}

impl AwardStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Draft => "draft",
        }
    }
}

impl Default for AwardStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for AwardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AwardStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "draft" => Ok(Self::Draft),
            _ => Err(ParseEnumError {
                expected: "award status",
                got: s.to_string(),
            }),
        }
    }
}

/// A registered industrial award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub id: RecordId,
    /// Register code, e.g. `AW-2023-001`.
    pub code: String,
    pub title: String,
    pub union_name: String,
    pub employer: String,
    pub award_type: AwardType,
    /// Date the instrument takes effect (ISO-8601).
    pub commencement_date: String,
    /// Date entered in the register (ISO-8601).
    pub registration_date: String,
    /// Instrument term, e.g. `3 years`.
    pub duration: String,
    pub gazette_number: String,
    pub gazette_date: String,
    pub status: AwardStatus,
    pub description: Option<String>,
    /// Ids of documents filed against this award.
    pub documents: Vec<String>,
}

impl Default for Award {
    fn default() -> Self {
        Self {
            id: RecordId::default(),
            code: String::new(),
            title: String::new(),
            union_name: String::new(),
            employer: String::new(),
            award_type: AwardType::Mwb,
            commencement_date: String::new(),
            registration_date: String::new(),
            duration: String::new(),
            gazette_number: String::new(),
            gazette_date: String::new(),
            status: AwardStatus::default(),
            description: None,
            documents: Vec::new(),
        }
    }
}

impl Record for Award {
    const KIND: RecordKind = RecordKind::Award;
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "code", "union_name", "employer"];
    const DATE_FIELD: &'static str = "registration_date";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("code", &self.code),
            ("union_name", &self.union_name),
        ] {
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
