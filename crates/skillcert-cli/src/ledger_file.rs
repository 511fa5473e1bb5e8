//! # Ledger File
//!
//! The CLI keeps the whole registry in one JSON file: a [`LedgerSnapshot`]
//! plus the ownership ledger's assignments. Every command opens the file,
//! rebuilds a controller from it, runs one operation, and writes the file
//! back if the operation changed anything.
//!
//! Writes go to a sibling temporary file first and are renamed into place,
//! so an interrupted write never leaves a truncated ledger behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use skillcert_core::{Clock, CredentialId, Principal};
use skillcert_state::{LedgerSnapshot, LifecycleController, MemoryOwnershipLedger};

/// One ownership assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerEntry {
    pub id: CredentialId,
    pub owner: Principal,
}

/// On-disk layout of the ledger file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFile {
    pub ledger: LedgerSnapshot,
    #[serde(default)]
    pub owners: Vec<OwnerEntry>,
}

/// A controller loaded from a ledger file.
pub struct Session {
    path: PathBuf,
    controller: LifecycleController,
    ownership: Arc<MemoryOwnershipLedger>,
}

impl Session {
    /// Create a new, empty ledger file administered by `administrator`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(path: &Path, administrator: Principal, force: bool) -> Result<()> {
        if administrator.is_null() {
            bail!("administrator must not be null");
        }
        if path.exists() && !force {
            bail!(
                "ledger file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        let file = LedgerFile {
            ledger: LedgerSnapshot::empty(administrator),
            owners: Vec::new(),
        };
        write_atomically(path, &file)
    }

    /// Load the ledger file at `path`, reading time from `clock`.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        if !path.exists() {
            bail!(
                "ledger file not found: {} (run `skillcert init` first)",
                path.display()
            );
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: LedgerFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let ownership = Arc::new(MemoryOwnershipLedger::from_owners(
            file.owners.into_iter().map(|e| (e.id, e.owner)),
        ));
        let controller = LifecycleController::builder(file.ledger.administrator.clone())
            .ledger(ownership.clone())
            .clock(clock)
            .restore(file.ledger)
            .with_context(|| format!("ledger file {} is inconsistent", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            credentials = controller.credential_count(),
            "opened ledger file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            controller,
            ownership,
        })
    }

    /// The restored controller.
    pub fn controller(&self) -> &LifecycleController {
        &self.controller
    }

    /// Write the controller's current state back to the file.
    pub fn save(&self) -> Result<()> {
        let file = LedgerFile {
            ledger: self.controller.snapshot(),
            owners: self
                .ownership
                .owners()
                .into_iter()
                .map(|(id, owner)| OwnerEntry { id, owner })
                .collect(),
        };
        write_atomically(&self.path, &file)
    }
}

fn write_atomically(path: &Path, file: &LedgerFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(file)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
