//! Project and user configuration.
//!
//! Project config lives at `.docket/config.toml` in the registry root;
//! user config at `<config_dir>/docket/config.toml`. Missing files mean
//! defaults; unparseable files are errors with file-path context.

use crate::export::ExportFormat;
use crate::view::DateSort;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Format used when a bulk export names none.
    #[serde(default)]
    pub default_format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Date sort applied when a listing names none.
    #[serde(default)]
    pub default_sort: Option<DateSort>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Actor recorded on audit entries when no flag or env override is set.
    #[serde(default)]
    pub actor: Option<String>,
}

/// User-level preferences, shared across registries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred output mode name (`pretty` | `text` | `json`).
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Load `.docket/config.toml` under `registry_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_project_config(registry_root: &Path) -> Result<ProjectConfig> {
    let path = registry_root.join(".docket/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config from the OS config directory, or defaults if absent.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("docket/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{ProjectConfig, load_project_config};
    use crate::export::ExportFormat;
    use crate::view::DateSort;
    use std::fs;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config.export.default_format, ExportFormat::Csv);
        assert!(config.view.default_sort.is_none());
        assert!(config.identity.actor.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join(".docket")).expect("mkdir");
        fs::write(
            dir.path().join(".docket/config.toml"),
            "[view]\ndefault_sort = \"newest\"\n",
        )
        .expect("write");

        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config.view.default_sort, Some(DateSort::Newest));
        assert_eq!(config.export.default_format, ExportFormat::Csv);
    }

    #[test]
    fn bad_toml_is_an_error_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join(".docket")).expect("mkdir");
        fs::write(dir.path().join(".docket/config.toml"), "export = nonsense").expect("write");

        let err = load_project_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = ProjectConfig::default();
        let rendered = toml::to_string(&config).expect("serialize");
        let back: ProjectConfig = toml::from_str(&rendered).expect("parse");
        assert_eq!(back.export.default_format, config.export.default_format);
    }
}
