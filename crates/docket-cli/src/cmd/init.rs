//! `dk init` — initialize a registry in the current directory.

use crate::output::{CliError, OutputMode, render, render_error};
use crate::vault::JsonVault;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;

#[derive(Args, Debug)]
pub struct InitArgs {}

#[derive(Serialize)]
struct InitReport {
    registry_root: String,
}

pub fn run_init(_args: &InitArgs, output: OutputMode) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let vault = match JsonVault::init(&cwd) {
        Ok(vault) => vault,
        Err(err) => {
            render_error(output, &CliError::new(err.to_string()))?;
            anyhow::bail!("{err}");
        }
    };

    let report = InitReport {
        registry_root: vault.registry_root().display().to_string(),
    };
    render(output, &report, |r, w| {
        writeln!(w, "Initialized registry at {}", r.registry_root)
    })
}

#[cfg(test)]
mod tests {
    use super::InitArgs;

    #[test]
    fn init_takes_no_arguments() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: InitArgs,
        }
        assert!(Wrapper::try_parse_from(["test"]).is_ok());
        assert!(Wrapper::try_parse_from(["test", "--bogus"]).is_err());
    }
}
