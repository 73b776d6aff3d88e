use crate::model::record::RecordKind;
use crate::model::record_id::RecordId;
use std::fmt;

/// Machine-readable error codes for operator- and agent-friendly handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    RecordNotFound,
    ValidationFailed,
    ImmutableField,
    UnknownField,
    DuplicateId,
    PersistenceFailed,
    ExportFailed,
    ExportUnsupported,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::RecordNotFound => "E2001",
            Self::ValidationFailed => "E2002",
            Self::ImmutableField => "E2003",
            Self::UnknownField => "E2004",
            Self::DuplicateId => "E3001",
            Self::PersistenceFailed => "E5001",
            Self::ExportFailed => "E5002",
            Self::ExportUnsupported => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Registry not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::RecordNotFound => "Record not found",
            Self::ValidationFailed => "Record validation failed",
            Self::ImmutableField => "Immutable field in patch",
            Self::UnknownField => "Unknown field in patch",
            Self::DuplicateId => "Duplicate record id",
            Self::PersistenceFailed => "Persistence collaborator failed",
            Self::ExportFailed => "Export collaborator failed",
            Self::ExportUnsupported => "Export format not supported",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `dk init` to initialize a registry here."),
            Self::ConfigParseError => Some("Fix syntax in .docket/config.toml and retry."),
            Self::RecordNotFound => None,
            Self::ValidationFailed => Some("Supply the required fields and retry."),
            Self::ImmutableField => Some("Ids are assigned at create time and never change."),
            Self::UnknownField => Some("Use one of the record's documented field names."),
            Self::DuplicateId => Some("The vault contains two records with the same id; repair it."),
            Self::PersistenceFailed => Some("Check disk space and write permissions."),
            Self::ExportFailed => Some("Retry the export once the collaborator is reachable."),
            Self::ExportUnsupported => Some("Use `csv`, or attach an exporter that supports the format."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A record or patch failed basic presence/shape checks.
///
/// Raised before any mutation or audit entry is created; the collection and
/// log remain untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} field '{field}' is required")]
    MissingField { kind: RecordKind, field: &'static str },

    #[error("field 'id' is immutable and cannot be patched")]
    ImmutableId,

    #[error("unknown {kind} field '{field}'")]
    UnknownField { kind: RecordKind, field: String },

    #[error("invalid {kind} patch: {message}")]
    InvalidShape { kind: RecordKind, message: String },

    #[error("{kind} field '{field}' is out of range: {message}")]
    OutOfRange {
        kind: RecordKind,
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ImmutableId => ErrorCode::ImmutableField,
            Self::UnknownField { .. } => ErrorCode::UnknownField,
            Self::MissingField { .. } | Self::InvalidShape { .. } | Self::OutOfRange { .. } => {
                ErrorCode::ValidationFailed
            }
        }
    }
}

/// Errors surfaced by [`RecordStore`](crate::store::RecordStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A single-record operation referenced a nonexistent id.
    #[error("{kind} record '{id}' not found")]
    NotFound { kind: RecordKind, id: RecordId },

    /// Two records with the same id were handed to the store.
    #[error("duplicate {kind} record id '{id}'")]
    DuplicateId { kind: RecordKind, id: RecordId },

    /// The caller supplied fields failing presence/shape checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The persistence or export collaborator failed; nothing was mutated
    /// for the operation (or id) that observed the failure.
    #[error("{collaborator} collaborator failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

impl StoreError {
    pub(crate) fn not_found(kind: RecordKind, id: &RecordId) -> Self {
        Self::NotFound {
            kind,
            id: id.clone(),
        }
    }

    pub(crate) fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.into(),
        }
    }

    /// The stable machine code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::RecordNotFound,
            Self::DuplicateId { .. } => ErrorCode::DuplicateId,
            Self::Validation(v) => v.code(),
            Self::Collaborator { collaborator, .. } => match *collaborator {
                "export" => ErrorCode::ExportFailed,
                _ => ErrorCode::PersistenceFailed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, StoreError, ValidationError};
    use crate::model::record::RecordKind;
    use crate::model::record_id::RecordId;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::RecordNotFound,
            ErrorCode::ValidationFailed,
            ErrorCode::ImmutableField,
            ErrorCode::UnknownField,
            ErrorCode::DuplicateId,
            ErrorCode::PersistenceFailed,
            ErrorCode::ExportFailed,
            ErrorCode::ExportUnsupported,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::RecordNotFound.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn store_error_maps_to_codes() {
        let not_found = StoreError::not_found(RecordKind::Award, &RecordId::new_unchecked("dk-x"));
        assert_eq!(not_found.code(), ErrorCode::RecordNotFound);

        let validation = StoreError::Validation(ValidationError::ImmutableId);
        assert_eq!(validation.code(), ErrorCode::ImmutableField);

        let export = StoreError::collaborator("export", "boom");
        assert_eq!(export.code(), ErrorCode::ExportFailed);

        let persistence = StoreError::collaborator("persistence", "disk full");
        assert_eq!(persistence.code(), ErrorCode::PersistenceFailed);
    }

    #[test]
    fn validation_error_display_names_the_field() {
        let err = ValidationError::MissingField {
            kind: RecordKind::Award,
            field: "title",
        };
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("award"));
    }
}
