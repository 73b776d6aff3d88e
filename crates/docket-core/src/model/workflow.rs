//! Registration workflow records.
//!
//! A workflow tracks one in-flight registry process (a union registration,
//! an award variation, a compliance review) from lodgement to completion.

use crate::error::ValidationError;
use crate::model::record::{ParseEnumError, Record, RecordKind};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl WorkflowStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseEnumError {
                expected: "workflow status",
                got: s.to_string(),
            }),
        }
    }
}

/// Processing priority for a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

/// One in-flight registry process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Workflow {
    pub id: RecordId,
    pub name: String,
    /// Process template, e.g. `union_registration`, `award_variation`.
    pub workflow_type: String,
    pub category: String,
    pub status: WorkflowStatus,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub assigned: Vec<String>,
    /// Statutory deadline (ISO-8601).
    pub due_date: String,
    pub priority: Priority,
    pub notes: String,
}

impl Record for Workflow {
    const KIND: RecordKind = RecordKind::Workflow;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category", "workflow_type"];
    const DATE_FIELD: &'static str = "due_date";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                kind: Self::KIND,
                field: "name",
            });
        }
        if self.progress > 100 {
            return Err(ValidationError::OutOfRange {
                kind: Self::KIND,
                field: "progress",
                message: format!("{} exceeds 100", self.progress),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Workflow, WorkflowStatus};
    use crate::error::ValidationError;
    use crate::model::record::Record;
    use std::str::FromStr;

    #[test]
    fn status_and_priority_roundtrip() {
        for value in [
            WorkflowStatus::Pending,
            WorkflowStatus::InProgress,
            WorkflowStatus::Completed,
            WorkflowStatus::Overdue,
        ] {
            assert_eq!(WorkflowStatus::from_str(&value.to_string()).unwrap(), value);
        }
        for value in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_str(&value.to_string()).unwrap(), value);
        }
        assert_eq!(
            serde_json::to_string(&WorkflowStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn validate_bounds_progress() {
        let workflow = Workflow {
            name: "HSU rule change".into(),
            progress: 101,
            ..Workflow::default()
        };
        assert!(matches!(
            workflow.validate(),
            Err(ValidationError::OutOfRange { field: "progress", .. })
        ));

        let ok = Workflow {
            progress: 100,
            ..workflow
        };
        assert!(ok.validate().is_ok());
    }
}
