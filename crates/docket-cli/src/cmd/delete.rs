//! `dk delete` — remove an award from the register.

use crate::cmd::{Session, fail_store};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::Args;
use docket_core::RecordId;
use serde::Serialize;
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Award id.
    pub id: String,
}

#[derive(Serialize)]
struct DeleteReport {
    id: String,
    code: String,
    title: String,
}

pub fn run_delete(
    args: &DeleteArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut session = Session::open(output)?;
    let actor = session.require_actor(actor_flag, output)?;

    let id = match RecordId::parse(&args.id) {
        Ok(id) => id,
        Err(e) => {
            render_error(output, &CliError::new(e.to_string()))?;
            anyhow::bail!("{e}");
        }
    };

    let removed = match session.store.remove(&id, &actor) {
        Ok(removed) => removed,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    let report = DeleteReport {
        id: removed.id.to_string(),
        code: removed.code,
        title: removed.title,
    };
    render(output, &report, |r, w| {
        writeln!(w, "Deleted award {} ({} — {})", r.id, r.code, r.title)
    })
}
