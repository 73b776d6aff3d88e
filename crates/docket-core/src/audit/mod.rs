//! Audit trail: immutable records of every mutating registry operation.
//!
//! Each store operation appends exactly one [`AuditEntry`] carrying a
//! field-level diff of what changed. Entries are never mutated or removed
//! by the core; retention and pruning are a collaborator's concern.

pub mod diff;
pub mod log;

pub use diff::{FieldComparator, FieldComparators, diff_snapshots};
pub use log::AuditLog;

use crate::model::record_id::{ActorId, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The five auditable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
    Export,
}

impl AuditAction {
    /// All actions in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::StatusChange,
        Self::Export,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::StatusChange => "status_change",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = UnknownAuditAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "status_change" => Ok(Self::StatusChange),
            "export" => Ok(Self::Export),
            _ => Err(UnknownAuditAction { raw: s.to_string() }),
        }
    }
}

/// Error returned when parsing an unknown audit action string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAuditAction {
    pub raw: String,
}

impl fmt::Display for UnknownAuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown audit action '{}': expected one of create, update, delete, \
             status_change, export",
            self.raw
        )
    }
}

impl std::error::Error for UnknownAuditAction {}

/// One field's before/after pair. At least one side is always set, and
/// neither side is ever JSON null (null counts as absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

/// An immutable record of one mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id, independent of any record id.
    pub id: RecordId,

    pub action: AuditAction,

    /// The affected record. `None` for bulk operations, where the id list
    /// is carried in `changes["ids"]` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<RecordId>,

    /// Who performed the operation. Supplied by the caller.
    pub actor: ActorId,

    /// Wall-clock microseconds since the Unix epoch.
    pub recorded_at_us: i64,

    /// Field name → before/after pair, containing only fields whose value
    /// changed.
    pub changes: BTreeMap<String, FieldChange>,
}

/// Current wall clock in microseconds since the Unix epoch.
pub(crate) fn wall_ts_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

#[cfg(test)]
mod tests {
    use super::{AuditAction, AuditEntry, FieldChange, UnknownAuditAction};
    use crate::model::record_id::{ActorId, RecordId};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn action_display_fromstr_roundtrip() {
        for action in AuditAction::ALL {
            let parsed: AuditAction = action.as_str().parse().expect("should parse");
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn action_rejects_unknown() {
        let err = "merge".parse::<AuditAction>().unwrap_err();
        assert_eq!(err, UnknownAuditAction { raw: "merge".into() });
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn action_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&AuditAction::StatusChange).unwrap(),
            "\"status_change\""
        );
    }

    #[test]
    fn entry_json_roundtrip() {
        let mut changes = BTreeMap::new();
        changes.insert(
            "status".to_string(),
            FieldChange {
                old: Some(json!("draft")),
                new: Some(json!("active")),
            },
        );
        let entry = AuditEntry {
            id: RecordId::new_unchecked("dk-log1"),
            action: AuditAction::Update,
            entity_id: Some(RecordId::new_unchecked("dk-aw01")),
            actor: ActorId::from("registrar-clerk"),
            recorded_at_us: 1_708_012_200_123_456,
            changes,
        };

        let json = serde_json::to_string(&entry).expect("serialize");
        let back: AuditEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entry);
    }

    #[test]
    fn one_sided_change_omits_absent_side() {
        let change = FieldChange {
            old: None,
            new: Some(json!("x")),
        };
        let json = serde_json::to_string(&change).expect("serialize");
        assert!(!json.contains("old"));
        let back: FieldChange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, change);
    }
}
