//! `dk list` — list awards with optional filters and sort order.

use crate::cmd::Session;
use crate::output::{CliError, OutputMode, pretty_rule, render_error, render_mode};
use clap::Args;
use docket_core::model::award::Award;
use docket_core::{DateSort, FilterCriteria};
use serde::Serialize;
use serde_json::json;
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Substring search across title, code, union, and employer.
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status (draft, active, expired).
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by instrument type (mwb, psca, tsca).
    #[arg(long = "type")]
    pub award_type: Option<String>,

    /// Filter by union name (exact match).
    #[arg(long)]
    pub union: Option<String>,

    /// Sort by registration date: newest or oldest.
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Serialize)]
struct ListReport {
    count: usize,
    total: usize,
    awards: Vec<Award>,
}

pub fn run_list(args: &ListArgs, output: OutputMode) -> anyhow::Result<()> {
    let session = Session::open(output)?;

    let mut criteria = FilterCriteria::new();
    if let Some(search) = &args.search {
        criteria = criteria.search(search.clone());
    }
    if let Some(status) = &args.status {
        criteria = criteria.equals("status", json!(status.to_lowercase()));
    }
    if let Some(award_type) = &args.award_type {
        criteria = criteria.equals("award_type", json!(award_type.to_lowercase()));
    }
    if let Some(union) = &args.union {
        criteria = criteria.equals("union_name", json!(union.clone()));
    }

    let sort = args
        .sort
        .as_deref()
        .map(str::parse::<DateSort>)
        .transpose();
    let sort = match sort {
        Ok(sort) => sort.or(session.config.view.default_sort),
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(format!("{e}"), "Use newest or oldest", "invalid_sort"),
            )?;
            anyhow::bail!("{e}");
        }
    };
    if let Some(sort) = sort {
        criteria = criteria.sorted(sort);
    }

    let view = session.store.view(&criteria);
    let report = ListReport {
        count: view.records.len(),
        total: view.total_count,
        awards: view.records,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for award in &r.awards {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    award.id, award.code, award.status, award.registration_date, award.title
                )?;
            }
            Ok(())
        },
        |r, w| {
            writeln!(w, "Awards ({} of {})", r.count, r.total)?;
            pretty_rule(w)?;
            for award in &r.awards {
                writeln!(
                    w,
                    "{:<12} {:<14} {:<8} {:<12} {}",
                    award.id, award.code, award.status, award.registration_date, award.title
                )?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::ListArgs;

    #[test]
    fn list_args_all_optional() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.search.is_none());
        assert!(w.args.sort.is_none());

        let w = Wrapper::parse_from(["test", "--status", "active", "--sort", "newest"]);
        assert_eq!(w.args.status.as_deref(), Some("active"));
        assert_eq!(w.args.sort.as_deref(), Some("newest"));
    }
}
