#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod output;
mod vault;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dk: registry records for an industrial registrar",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Override actor identity (skips env/config resolution).
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Get the actor flag as an `Option<&str>` for resolution.
    fn actor_flag(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a registry",
        long_about = "Initialize a docket registry in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a registry in the current directory\n    dk init\n\n    # Emit machine-readable output\n    dk init --format json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Register a new award",
        long_about = "Register a new award and record a create audit entry.",
        after_help = "EXAMPLES:\n    # Register a draft award\n    dk create --title \"Teachers Award 2024\" --code AW-001 --union ATU\n\n    # Register an active award with dates\n    dk create --title \"Nurses Award\" --code AW-002 --union HSU \\\n        --status active --registered 2024-03-01\n\n    # Emit machine-readable output\n    dk create --title \"Teachers Award 2024\" --code AW-001 --union ATU --format json"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Read",
        about = "List awards",
        long_about = "List awards with optional filters and sort order.",
        after_help = "EXAMPLES:\n    # List everything in register order\n    dk list\n\n    # Active MWB awards, newest first\n    dk list --status active --type mwb --sort newest\n\n    # Substring search\n    dk list --search teachers"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one award",
        long_about = "Show full details for a single award by id.",
        after_help = "EXAMPLES:\n    # Show an award\n    dk show dk-a1b2\n\n    # Emit machine-readable output\n    dk show dk-a1b2 --format json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Update fields on an award",
        long_about = "Apply a shallow field patch to an award and record the diff.",
        after_help = "EXAMPLES:\n    # Activate an award\n    dk update dk-a1b2 --set status=active\n\n    # Several fields at once\n    dk update dk-a1b2 --set status=active --set \"employer=Department of Education\""
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete an award",
        long_about = "Remove an award from the register. The audit entry keeps the \
                      full prior snapshot.",
        after_help = "EXAMPLES:\n    # Delete an award\n    dk delete dk-a1b2"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Bulk",
        about = "Bulk actions over several awards",
        long_about = "Delete, change status, or export several awards in one audited step.",
        after_help = "EXAMPLES:\n    # Bulk delete\n    dk bulk delete --ids dk-a1,dk-a2\n\n    # Bulk status change\n    dk bulk status --ids dk-a1,dk-a2 --status active\n\n    # Export to CSV\n    dk bulk export --ids dk-a1,dk-a2 --format csv --out awards.csv"
    )]
    Bulk {
        #[command(subcommand)]
        command: cmd::bulk::BulkCommands,
    },

    #[command(
        next_help_heading = "Read",
        about = "Read the audit trail",
        long_about = "Read the audit trail, optionally narrowed to one award or action.",
        after_help = "EXAMPLES:\n    # Everything\n    dk history\n\n    # One award's history\n    dk history dk-a1b2\n\n    # Recent deletes\n    dk history --action delete --limit 10"
    )]
    History(cmd::history::HistoryArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    dk completions bash\n\n    # Generate zsh completions\n    dk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::resolve_output_mode(cli.format, cli.json);
    debug!(?output, command = ?std::env::args().nth(1), "dk starting");

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output),
        Commands::Create(args) => cmd::create::run_create(args, cli.actor_flag(), output),
        Commands::List(args) => cmd::list::run_list(args, output),
        Commands::Show(args) => cmd::show::run_show(args, output),
        Commands::Update(args) => cmd::update::run_update(args, cli.actor_flag(), output),
        Commands::Delete(args) => cmd::delete::run_delete(args, cli.actor_flag(), output),
        Commands::Bulk { command } => cmd::bulk::run_bulk(command, cli.actor_flag(), output),
        Commands::History(args) => cmd::history::run_history(args, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_anywhere() {
        use clap::Parser;
        let cli = Cli::parse_from(["dk", "list", "--format", "json", "--actor", "clerk"]);
        assert!(matches!(cli.command, super::Commands::List(_)));
        assert_eq!(cli.actor.as_deref(), Some("clerk"));
    }
}
