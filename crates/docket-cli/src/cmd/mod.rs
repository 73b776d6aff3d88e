//! Command handlers, one module per subcommand.

pub mod bulk;
pub mod completions;
pub mod create;
pub mod delete;
pub mod history;
pub mod init;
pub mod list;
pub mod show;
pub mod update;

use crate::identity;
use crate::output::{CliError, OutputMode, render_error};
use crate::vault::JsonVault;
use anyhow::Result;
use docket_core::config::{ProjectConfig, load_project_config};
use docket_core::model::award::Award;
use docket_core::{ActorId, AuditLog, RecordStore, StoreError};

/// An opened registry session: vault, config, and a store wired to the
/// vault as its persistence collaborator.
///
/// The store starts with an empty in-session audit log; `finish` appends
/// whatever the session produced to the vault's JSONL trail.
pub(crate) struct Session {
    pub vault: JsonVault,
    pub config: ProjectConfig,
    pub store: RecordStore<Award>,
}

impl Session {
    /// Discover the registry from the current directory and load it.
    pub fn open(output: OutputMode) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let vault = match JsonVault::discover(&cwd) {
            Ok(vault) => vault,
            Err(err) => {
                render_error(
                    output,
                    &CliError::with_details(
                        err.to_string(),
                        "Run `dk init` to initialize a registry here.",
                        "E1001",
                    ),
                )?;
                anyhow::bail!("{err}");
            }
        };

        let config = load_project_config(vault.registry_root())?;
        let records = vault.load_records::<Award>().map_err(|e| {
            let _ = render_error(output, &CliError::new(e.to_string()));
            anyhow::anyhow!("{e}")
        })?;

        let store = match RecordStore::from_parts(records, AuditLog::new()) {
            Ok(store) => store.with_persistence(Box::new(vault.clone())),
            Err(err) => return Err(fail_store(output, &err)),
        };

        Ok(Self {
            vault,
            config,
            store,
        })
    }

    /// Resolve the acting identity for a mutating command.
    pub fn require_actor(&self, cli_flag: Option<&str>, output: OutputMode) -> Result<ActorId> {
        match identity::require_actor(cli_flag, self.config.identity.actor.as_deref()) {
            Ok(actor) => Ok(ActorId::new(actor)),
            Err(e) => {
                render_error(
                    output,
                    &CliError::with_details(
                        &e.message,
                        "Set --actor, DOCKET_ACTOR, or [identity] actor",
                        e.code,
                    ),
                )?;
                anyhow::bail!("{}", e.message)
            }
        }
    }

    /// Append the session's audit entries to the vault trail.
    pub fn finish(&self) -> Result<()> {
        self.vault.append_audit(self.store.audit().entries())
    }
}

/// Render a store error and convert it for propagation.
pub(crate) fn fail_store(output: OutputMode, err: &StoreError) -> anyhow::Error {
    let cli = CliError::from_store(err);
    let _ = render_error(output, &cli);
    anyhow::anyhow!("{}", cli.message)
}
