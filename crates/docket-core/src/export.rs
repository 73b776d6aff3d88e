//! Export collaborator contract and the bundled CSV exporter.
//!
//! The store hands the exporter a list of record snapshots; the exporter
//! returns a downloadable artifact. Failures are surfaced as rejected
//! operations, never silent no-ops.
//!
//! # CSV format
//!
//! Header row of snapshot field names (sorted, so output is deterministic),
//! one row per record, CRLF line endings. Fields containing a comma, quote,
//! CR, or LF are quoted and embedded quotes doubled, per RFC 4180.

use crate::error::ErrorCode;
use crate::model::record::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Artifact formats an exporter may be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Csv
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = crate::model::record::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            _ => Err(crate::model::record::ParseEnumError {
                expected: "export format",
                got: s.to_string(),
            }),
        }
    }
}

/// A produced export artifact: bytes plus download metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Errors from an export collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// No records resolved for the requested ids; there is nothing to
    /// derive a header from, so the operation is rejected rather than
    /// producing an empty artifact.
    #[error("nothing to export")]
    Empty,

    #[error("{format} export is not supported by this exporter")]
    Unsupported { format: ExportFormat },

    #[error("failed to render {format} artifact: {message}")]
    Render {
        format: ExportFormat,
        message: String,
    },
}

impl ExportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unsupported { .. } => ErrorCode::ExportUnsupported,
            Self::Empty | Self::Render { .. } => ErrorCode::ExportFailed,
        }
    }
}

/// Export collaborator: turns record snapshots into a downloadable artifact.
pub trait Exporter {
    /// Produce an artifact for `rows` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when the format is unsupported or rendering
    /// fails; the caller must treat this as a rejected operation.
    fn export(&self, rows: &[Snapshot], format: ExportFormat) -> Result<ArtifactHandle, ExportError>;
}

/// The bundled CSV exporter.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    file_stem: String,
}

impl CsvExporter {
    #[must_use]
    pub fn new(file_stem: impl Into<String>) -> Self {
        Self {
            file_stem: file_stem.into(),
        }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new("records")
    }
}

impl Exporter for CsvExporter {
    fn export(&self, rows: &[Snapshot], format: ExportFormat) -> Result<ArtifactHandle, ExportError> {
        match format {
            ExportFormat::Csv => {
                let body = to_csv(rows)?;
                Ok(ArtifactHandle {
                    file_name: format!("{}-export.csv", self.file_stem),
                    content_type: "text/csv",
                    bytes: body.into_bytes(),
                })
            }
            ExportFormat::Excel => Err(ExportError::Unsupported { format }),
        }
    }
}

/// Render snapshots as a CSV document.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] for an empty row set.
pub fn to_csv(rows: &[Snapshot]) -> Result<String, ExportError> {
    let Some(first) = rows.first() else {
        return Err(ExportError::Empty);
    };

    // All rows come from the same record type, so the first row's key set
    // is the header for every row.
    let fields: Vec<&String> = first.keys().collect();

    let mut out = String::new();
    let header: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&header.join(","));
    out.push_str("\r\n");

    for row in rows {
        let cells: Vec<String> = fields
            .iter()
            .map(|f| {
                let rendered = row.get(*f).map_or_else(String::new, render_value);
                csv_field(&rendered).into_owned()
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push_str("\r\n");
    }
    Ok(out)
}

/// Quote a field per RFC 4180 when it contains a comma, quote, CR, or LF.
#[must_use]
pub fn csv_field(raw: &str) -> Cow<'_, str> {
    if raw.contains(['"', ',', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", raw.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Render one snapshot value as CSV cell text: strings verbatim, null as
/// empty, everything else as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ArtifactHandle, CsvExporter, ExportError, ExportFormat, Exporter, csv_field, to_csv};
    use crate::model::record::Snapshot;
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_layout_is_header_plus_rows() {
        let rows = vec![
            row(&[("code", json!("AW-001")), ("title", json!("Teachers Award"))]),
            row(&[("code", json!("AW-002")), ("title", json!("Nurses, Award"))]),
        ];
        let csv = to_csv(&rows).expect("render");
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "code,title");
        assert_eq!(lines[1], "AW-001,Teachers Award");
        assert_eq!(lines[2], "AW-002,\"Nurses, Award\"");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn null_and_non_string_values_render() {
        let rows = vec![row(&[
            ("description", json!(null)),
            ("documents", json!(["a", "b"])),
            ("member_count", json!(42)),
        ])];
        let csv = to_csv(&rows).expect("render");
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "description,documents,member_count");
        assert_eq!(lines[1], ",\"[\"\"a\"\",\"\"b\"\"]\",42");
    }

    #[test]
    fn empty_row_set_is_rejected() {
        assert!(matches!(to_csv(&[]), Err(ExportError::Empty)));
    }

    #[test]
    fn csv_exporter_produces_artifact() {
        let exporter = CsvExporter::new("awards");
        let rows = vec![row(&[("code", json!("AW-001"))])];
        let ArtifactHandle {
            file_name,
            content_type,
            bytes,
        } = exporter.export(&rows, ExportFormat::Csv).expect("export");
        assert_eq!(file_name, "awards-export.csv");
        assert_eq!(content_type, "text/csv");
        assert!(String::from_utf8(bytes).expect("utf8").starts_with("code"));
    }

    #[test]
    fn excel_is_declined_not_swallowed() {
        let exporter = CsvExporter::default();
        let rows = vec![row(&[("code", json!("AW-001"))])];
        let err = exporter.export(&rows, ExportFormat::Excel).unwrap_err();
        assert!(matches!(err, ExportError::Unsupported { .. }));
    }

    #[test]
    fn format_parse_roundtrip() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
