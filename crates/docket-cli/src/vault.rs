//! The JSON-file vault: `dk`'s persistence collaborator.
//!
//! Layout under the registry root:
//!
//! ```text
//! .docket/
//!   config.toml    project configuration
//!   awards.json    one JSON array per record kind
//!   audit.jsonl    append-only audit trail, one entry per line
//! ```
//!
//! Record files are whole-file JSON arrays (the registry scale is small);
//! the audit trail is JSONL so appends never rewrite history.

use anyhow::{Context, Result, bail};
use docket_core::model::record::Record;
use docket_core::{AuditEntry, AuditLog, Persistence, PersistenceError, RecordId};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Directory name marking a registry root.
pub const VAULT_DIR: &str = ".docket";

const DEFAULT_CONFIG: &str = "\
# docket registry configuration
[export]
default_format = \"csv\"

[view]
# default_sort = \"newest\"

[identity]
# actor = \"registrar-clerk\"
";

/// File-backed persistence for one registry.
#[derive(Debug, Clone)]
pub struct JsonVault {
    dir: PathBuf,
}

impl JsonVault {
    /// Create `.docket/` under `base` with a default config.
    ///
    /// # Errors
    ///
    /// Fails if the registry already exists or the directory is unwritable.
    pub fn init(base: &Path) -> Result<Self> {
        let dir = base.join(VAULT_DIR);
        if dir.exists() {
            bail!("registry already initialized at {}", dir.display());
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        fs::write(dir.join("config.toml"), DEFAULT_CONFIG)
            .with_context(|| "Failed to write default config")?;
        fs::write(dir.join("audit.jsonl"), "")
            .with_context(|| "Failed to create audit trail")?;
        Ok(Self { dir })
    }

    /// Find the nearest registry at `start` or any parent directory.
    ///
    /// # Errors
    ///
    /// Fails when no `.docket/` directory exists on the path to the root.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(VAULT_DIR);
            if candidate.is_dir() {
                return Ok(Self { dir: candidate });
            }
            current = dir.parent();
        }
        bail!(
            "no registry found at {} or any parent; run `dk init` first",
            start.display()
        )
    }

    /// The directory containing `.docket/`.
    #[must_use]
    pub fn registry_root(&self) -> &Path {
        self.dir.parent().unwrap_or(&self.dir)
    }

    fn records_path<R: Record>(&self) -> PathBuf {
        self.dir.join(format!("{}s.json", R::KIND))
    }

    fn audit_path(&self) -> PathBuf {
        self.dir.join("audit.jsonl")
    }

    /// Load every record of one kind; a missing file is an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] on unreadable or malformed files.
    pub fn load_records<R: Record>(&self) -> Result<Vec<R>, PersistenceError> {
        let path = self.records_path::<R>();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| PersistenceError::new(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| PersistenceError::new(format!("parse {}: {e}", path.display())))
    }

    fn write_records<R: Record>(&self, records: &[R]) -> Result<(), PersistenceError> {
        let path = self.records_path::<R>();
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| PersistenceError::new(format!("encode {}: {e}", path.display())))?;
        fs::write(&path, content)
            .map_err(|e| PersistenceError::new(format!("write {}: {e}", path.display())))
    }

    /// Rehydrate the audit log from `audit.jsonl`.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files or malformed lines.
    pub fn load_audit(&self) -> Result<AuditLog> {
        let path = self.audit_path();
        if !path.exists() {
            return Ok(AuditLog::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut entries = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(line)
                .with_context(|| format!("Malformed audit entry at {}:{}", path.display(), n + 1))?;
            entries.push(entry);
        }
        Ok(AuditLog::from_entries(entries))
    }

    /// Append entries to the audit trail. Existing lines are never touched.
    ///
    /// # Errors
    ///
    /// Fails when the trail cannot be opened or written.
    pub fn append_audit(&self, entries: &[AuditEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let path = self.audit_path();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        for entry in entries {
            let line = serde_json::to_string(entry).context("Failed to encode audit entry")?;
            writeln!(file, "{line}")
                .with_context(|| format!("Failed to append to {}", path.display()))?;
        }
        Ok(())
    }
}

impl<R: Record> Persistence<R> for JsonVault {
    fn fetch_all(&self) -> Result<Vec<R>, PersistenceError> {
        self.load_records()
    }

    fn persist(&mut self, record: &R) -> Result<(), PersistenceError> {
        let mut records: Vec<R> = self.load_records()?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_records(&records)
    }

    fn remove(&mut self, id: &RecordId) -> Result<(), PersistenceError> {
        let mut records: Vec<R> = self.load_records()?;
        records.retain(|r| r.id() != id);
        self.write_records(&records)
    }
}
