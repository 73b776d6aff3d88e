//! `dk completions` — generate shell completion scripts.

use clap::{Args, Command};
use clap_complete::{Shell, generate};
use std::io;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(args: &CompletionsArgs, cmd: &mut Command) -> anyhow::Result<()> {
    let name = cmd.get_name().to_string();
    generate(args.shell, cmd, name, &mut io::stdout());
    Ok(())
}
