//! `dk history` — read the audit trail.

use crate::cmd::Session;
use crate::output::{CliError, OutputMode, pretty_rule, render_error, render_mode};
use clap::Args;
use docket_core::{AuditAction, AuditEntry, RecordId};
use serde::Serialize;
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show history for one award only.
    pub id: Option<String>,

    /// Filter by action: create, update, delete, status_change, export.
    #[arg(long)]
    pub action: Option<String>,

    /// Show at most this many entries, newest last.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct HistoryReport {
    count: usize,
    entries: Vec<AuditEntry>,
}

fn summarize_changes(entry: &AuditEntry) -> String {
    if entry.changes.is_empty() {
        return String::from("-");
    }
    entry
        .changes
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn run_history(args: &HistoryArgs, output: OutputMode) -> anyhow::Result<()> {
    let session = Session::open(output)?;
    let log = session.vault.load_audit()?;

    let action = match args.action.as_deref().map(str::parse::<AuditAction>) {
        None => None,
        Some(Ok(action)) => Some(action),
        Some(Err(e)) => {
            render_error(output, &CliError::new(e.to_string()))?;
            anyhow::bail!("{e}");
        }
    };

    let entries: Vec<AuditEntry> = match &args.id {
        Some(raw) => {
            let id = match RecordId::parse(raw) {
                Ok(id) => id,
                Err(e) => {
                    render_error(output, &CliError::new(e.to_string()))?;
                    anyhow::bail!("{e}");
                }
            };
            log.for_entity(&id).into_iter().cloned().collect()
        }
        None => log.entries().to_vec(),
    };

    let mut entries: Vec<AuditEntry> = entries
        .into_iter()
        .filter(|e| action.is_none_or(|a| e.action == a))
        .collect();
    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    let report = HistoryReport {
        count: entries.len(),
        entries,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for entry in &r.entries {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    entry.recorded_at_us,
                    entry.action,
                    entry
                        .entity_id
                        .as_ref()
                        .map_or("-", docket_core::RecordId::as_str),
                    entry.actor,
                    summarize_changes(entry)
                )?;
            }
            Ok(())
        },
        |r, w| {
            writeln!(w, "Audit trail ({} entries)", r.count)?;
            pretty_rule(w)?;
            for entry in &r.entries {
                writeln!(
                    w,
                    "{:<20} {:<14} {:<12} {:<16} {}",
                    entry.recorded_at_us,
                    entry.action.as_str(),
                    entry
                        .entity_id
                        .as_ref()
                        .map_or("-", docket_core::RecordId::as_str),
                    entry.actor.as_str(),
                    summarize_changes(entry)
                )?;
            }
            Ok(())
        },
    )
}
