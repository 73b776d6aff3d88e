//! `dk update` — patch fields on an existing award.

use crate::cmd::{Session, fail_store};
use crate::output::{CliError, OutputMode, pretty_kv, render, render_error};
use clap::Args;
use docket_core::{Patch, RecordId};
use serde_json::Value;
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Award id.
    pub id: String,

    /// Field assignment `field=value`, repeatable. Values parse as JSON
    /// when they can (numbers, arrays), as plain text otherwise.
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    pub sets: Vec<String>,
}

/// Parse `--set` pairs into a patch.
fn parse_sets(sets: &[String]) -> Result<Patch, String> {
    let mut patch = Patch::new();
    for pair in sets {
        let Some((field, raw)) = pair.split_once('=') else {
            return Err(format!("invalid --set '{pair}': expected FIELD=VALUE"));
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("invalid --set '{pair}': empty field name"));
        }
        // JSON first, so `--set progress=40` and `--set documents=["a"]`
        // carry typed values; anything unparseable is a plain string.
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        patch = patch.set(field, value);
    }
    Ok(patch)
}

pub fn run_update(
    args: &UpdateArgs,
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
    let patch = match parse_sets(&args.sets) {
        Ok(patch) => patch,
        Err(message) => {
            render_error(output, &CliError::new(&message))?;
            anyhow::bail!("{message}");
        }
    };

    let updated = match session.store.update(&id, &patch, &actor) {
        Ok(updated) => updated,
        Err(err) => return Err(fail_store(output, &err)),
    };
    session.finish()?;

    render(output, &updated, |award, w| {
        writeln!(w, "Updated award {}", award.id)?;
        pretty_kv(w, "status", award.status.as_str())?;
        pretty_kv(w, "title", &award.title)
    })
}
