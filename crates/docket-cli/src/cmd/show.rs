//! `dk show` — show one award in full.

use crate::cmd::Session;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render, render_error};
use clap::Args;
use docket_core::{ErrorCode, RecordId};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Award id.
    pub id: String,
}

pub fn run_show(args: &ShowArgs, output: OutputMode) -> anyhow::Result<()> {
    let session = Session::open(output)?;

    let id = match RecordId::parse(&args.id) {
        Ok(id) => id,
        Err(e) => {
            render_error(output, &CliError::new(e.to_string()))?;
            anyhow::bail!("{e}");
        }
    };

    let Some(award) = session.store.get(&id) else {
        let code = ErrorCode::RecordNotFound;
        render_error(
            output,
            &CliError::with_details(
                format!("award '{id}' not found"),
                "Check the id with `dk list`",
                code.code(),
            ),
        )?;
        anyhow::bail!("award '{id}' not found");
    };

    render(output, award, |award, w| {
        pretty_section(w, &format!("{} — {}", award.code, award.title))?;
        pretty_kv(w, "id", award.id.as_str())?;
        pretty_kv(w, "union", &award.union_name)?;
        pretty_kv(w, "employer", &award.employer)?;
        pretty_kv(w, "type", award.award_type.label())?;
        pretty_kv(w, "status", award.status.as_str())?;
        pretty_kv(w, "commencement", &award.commencement_date)?;
        pretty_kv(w, "registered", &award.registration_date)?;
        pretty_kv(w, "duration", &award.duration)?;
        pretty_kv(w, "gazette", &award.gazette_number)?;
        pretty_kv(w, "gazette date", &award.gazette_date)?;
        if let Some(description) = &award.description {
            pretty_kv(w, "description", description)?;
        }
        if !award.documents.is_empty() {
            pretty_kv(w, "documents", award.documents.join(", "))?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::ShowArgs;

    #[test]
    fn show_requires_an_id() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ShowArgs,
        }
        assert!(Wrapper::try_parse_from(["test"]).is_err());
        let w = Wrapper::parse_from(["test", "dk-a1b2"]);
        assert_eq!(w.args.id, "dk-a1b2");
    }
}
