//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--actor` flag > `DOCKET_ACTOR` env > configured
//! actor > `USER` env (TTY only). Mutating commands require an identity so
//! every audit entry names who acted; read-only commands work without one.

use std::env;

/// Errors from actor resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorResolutionError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for ActorResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActorResolutionError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

/// Core resolution logic, parameterized by environment reader.
fn resolve_actor_with(
    cli_flag: Option<&str>,
    configured: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    // Step 1: explicit --actor flag
    if let Some(actor) = cli_flag {
        if !actor.is_empty() {
            return Some(actor.to_string());
        }
    }

    // Step 2: DOCKET_ACTOR env
    if let Some(val) = env.get("DOCKET_ACTOR") {
        return Some(val);
    }

    // Step 3: configured actor (project or user config)
    if let Some(actor) = configured {
        if !actor.is_empty() {
            return Some(actor.to_string());
        }
    }

    // Step 4: USER env, but only if stdin is a TTY
    if env.is_tty() {
        if let Some(val) = env.get("USER") {
            return Some(val);
        }
    }

    None
}

/// Resolve the actor identity following the 4-step chain:
///
/// 1. `--actor` CLI flag (passed as `cli_flag`)
/// 2. `DOCKET_ACTOR` environment variable
/// 3. `[identity] actor` from config (passed as `configured`)
/// 4. `USER` environment variable (only if running in a TTY)
///
/// Returns `None` if no identity could be resolved.
pub fn resolve_actor(cli_flag: Option<&str>, configured: Option<&str>) -> Option<String> {
    resolve_actor_with(cli_flag, configured, &RealEnv)
}

/// Resolve the actor identity, returning an error if not found.
///
/// Use this for mutating commands that write audit entries.
pub fn require_actor(
    cli_flag: Option<&str>,
    configured: Option<&str>,
) -> Result<String, ActorResolutionError> {
    resolve_actor(cli_flag, configured).ok_or_else(|| ActorResolutionError {
        message: "Actor identity required for this command. \
                  Set --actor, DOCKET_ACTOR, or [identity] actor in config."
            .to_string(),
        code: "missing_actor",
    })
}
