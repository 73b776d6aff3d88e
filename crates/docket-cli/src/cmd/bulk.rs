//! `dk bulk` — bulk actions over several awards at once.
//!
//! Missing ids are tolerated and reported, matching the store's bulk
//! semantics; only export failures abort the whole operation.

use crate::cmd::{Session, fail_store};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::{Args, Subcommand};
use docket_core::model::award::AwardStatus;
use docket_core::{BulkAction, BulkFailure, CsvExporter, ExportFormat, RecordId};
use serde::Serialize;
use serde_json::json;
use std::io::Write as _;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum BulkCommands {
    /// Delete every listed award that exists.
    Delete(BulkDeleteArgs),
    /// Set the status on every listed award.
    Status(BulkStatusArgs),
    /// Export the listed awards to a file.
    Export(BulkExportArgs),
}

#[derive(Args, Debug)]
pub struct BulkDeleteArgs {
    /// Award ids, comma-separated or repeated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct BulkStatusArgs {
    /// Award ids, comma-separated or repeated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<String>,

    /// Target status: draft, active, or expired.
    #[arg(long)]
    pub status: String,
}

#[derive(Args, Debug)]
pub struct BulkExportArgs {
    /// Award ids, comma-separated or repeated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<String>,

    /// Artifact format: csv or excel. Defaults to the configured format.
    #[arg(long)]
    pub format: Option<String>,

    /// Output path. Defaults to the artifact's own file name.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct BulkReport {
    action: &'static str,
    requested: usize,
    applied: usize,
    missing: Vec<String>,
    failed: Vec<BulkFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
}

fn parse_ids(raw: &[String], output: OutputMode) -> anyhow::Result<Vec<RecordId>> {
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        match RecordId::parse(value) {
            Ok(id) => ids.push(id),
            Err(e) => {
                render_error(output, &CliError::new(e.to_string()))?;
                anyhow::bail!("{e}");
            }
        }
    }
    Ok(ids)
}

fn render_report(output: OutputMode, report: &BulkReport) -> anyhow::Result<()> {
    render(output, report, |r, w| {
        writeln!(
            w,
            "{}: {} of {} applied ({} missing, {} failed)",
            r.action,
            r.applied,
            r.requested,
            r.missing.len(),
            r.failed.len()
        )?;
        for failure in &r.failed {
            writeln!(w, "  failed {}: {}", failure.id, failure.error)?;
        }
        if let Some(artifact) = &r.artifact {
            writeln!(w, "  wrote {artifact}")?;
        }
        Ok(())
    })
}

pub fn run_bulk(
    command: &BulkCommands,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    match command {
        BulkCommands::Delete(args) => run_delete(args, actor_flag, output),
        BulkCommands::Status(args) => run_status(args, actor_flag, output),
        BulkCommands::Export(args) => run_export(args, actor_flag, output),
    }
}

fn run_delete(
    args: &BulkDeleteArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut session = Session::open(output)?;
    let actor = session.require_actor(actor_flag, output)?;
    let ids = parse_ids(&args.ids, output)?;
    let requested = ids.len();

    let outcome = match session.store.bulk(&BulkAction::Delete { ids }, &actor) {
        Ok(outcome) => outcome,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    render_report(
        output,
        &BulkReport {
            action: "bulk delete",
            requested,
            applied: outcome.applied.len(),
            missing: outcome.missing.iter().map(ToString::to_string).collect(),
            failed: outcome.failed,
            artifact: None,
        },
    )
}

fn run_status(
    args: &BulkStatusArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut session = Session::open(output)?;
    let actor = session.require_actor(actor_flag, output)?;
    let ids = parse_ids(&args.ids, output)?;
    let requested = ids.len();

    // Validate up front for a friendlier error than per-id patch failures.
    let status: AwardStatus = match args.status.parse() {
        Ok(status) => status,
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{e}"),
                    "Use draft, active, or expired",
                    "invalid_status",
                ),
            )?;
            anyhow::bail!("{e}");
        }
    };

    let action = BulkAction::StatusChange {
        ids,
        status: json!(status.as_str()),
    };
    let outcome = match session.store.bulk(&action, &actor) {
        Ok(outcome) => outcome,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    render_report(
        output,
        &BulkReport {
            action: "bulk status change",
            requested,
            applied: outcome.applied.len(),
            missing: outcome.missing.iter().map(ToString::to_string).collect(),
            failed: outcome.failed,
            artifact: None,
        },
    )
}

fn run_export(
    args: &BulkExportArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let session = Session::open(output)?;
    let actor = session.require_actor(actor_flag, output)?;
    let ids = parse_ids(&args.ids, output)?;
    let requested = ids.len();

    let format = match &args.format {
        Some(raw) => match raw.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(e) => {
                render_error(
                    output,
                    &CliError::with_details(format!("{e}"), "Use csv or excel", "invalid_format"),
                )?;
                anyhow::bail!("{e}");
            }
        },
        None => session.config.export.default_format,
    };

    let mut session = session;
    session
        .store
        .set_exporter(Box::new(CsvExporter::new("awards")));

    let outcome = match session
        .store
        .bulk(&BulkAction::Export { ids, format }, &actor)
    {
        Ok(outcome) => outcome,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    let artifact = outcome
        .artifact
        .ok_or_else(|| anyhow::anyhow!("export produced no artifact"))?;
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    std::fs::write(&out_path, &artifact.bytes)?;

    render_report(
        output,
        &BulkReport {
            action: "bulk export",
            requested,
            applied: outcome.applied.len(),
            missing: outcome.missing.iter().map(ToString::to_string).collect(),
            failed: outcome.failed,
            artifact: Some(out_path.display().to_string()),
        },
    )
}
