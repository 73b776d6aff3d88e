//! `dk create` — register a new award.

use crate::cmd::{Session, fail_store};
use crate::output::{CliError, OutputMode, pretty_kv, render, render_error};
use clap::Args;
use docket_core::model::award::{Award, AwardStatus, AwardType};
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the award instrument.
    #[arg(short, long)]
    pub title: String,

    /// Register code, e.g. AW-2024-001.
    #[arg(short, long)]
    pub code: String,

    /// Name of the union party.
    #[arg(short, long)]
    pub union: String,

    /// Name of the employer party.
    #[arg(short, long, default_value = "")]
    pub employer: String,

    /// Instrument type: mwb, psca, or tsca.
    #[arg(long = "type", default_value = "mwb")]
    pub award_type: String,

    /// Commencement date (ISO-8601).
    #[arg(long, default_value = "")]
    pub commencement: String,

    /// Registration date (ISO-8601).
    #[arg(long, default_value = "")]
    pub registered: String,

    /// Instrument term, e.g. "3 years".
    #[arg(long, default_value = "")]
    pub duration: String,

    /// Gazette number.
    #[arg(long, default_value = "")]
    pub gazette_number: String,

    /// Gazette date (ISO-8601).
    #[arg(long, default_value = "")]
    pub gazette_date: String,

    /// Initial status: draft, active, or expired.
    #[arg(short, long, default_value = "draft")]
    pub status: String,

    /// Description text.
    #[arg(short, long)]
    pub description: Option<String>,
}

pub fn run_create(
    args: &CreateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let session = Session::open(output)?;
    let actor = session.require_actor(actor_flag, output)?;

    let award_type: AwardType = match args.award_type.parse() {
        Ok(t) => t,
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(format!("{e}"), "Use mwb, psca, or tsca", "invalid_type"),
            )?;
            anyhow::bail!("{e}");
        }
    };
    let status: AwardStatus = match args.status.parse() {
        Ok(s) => s,
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

    let draft = Award {
        code: args.code.clone(),
        title: args.title.clone(),
        union_name: args.union.clone(),
        employer: args.employer.clone(),
        award_type,
        commencement_date: args.commencement.clone(),
        registration_date: args.registered.clone(),
        duration: args.duration.clone(),
        gazette_number: args.gazette_number.clone(),
        gazette_date: args.gazette_date.clone(),
        status,
        description: args.description.clone(),
        ..Award::default()
    };

    let mut session = session;
    let created = match session.store.create(draft, &actor) {
        Ok(created) => created,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    render(output, &created, |award, w| {
        writeln!(w, "Created award {}", award.id)?;
        pretty_kv(w, "code", &award.code)?;
        pretty_kv(w, "title", &award.title)?;
        pretty_kv(w, "union", &award.union_name)?;
        pretty_kv(w, "type", award.award_type.label())?;
        pretty_kv(w, "status", award.status.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::CreateArgs;

    #[test]
    fn create_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from([
            "test", "--title", "Teachers Award 2024", "--code", "AW-001", "--union", "ATU",
        ]);
        assert_eq!(w.args.title, "Teachers Award 2024");
        assert_eq!(w.args.award_type, "mwb");
        assert_eq!(w.args.status, "draft");
        assert!(w.args.description.is_none());
    }
}
