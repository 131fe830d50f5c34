//! Owner identity management.
//!
//! Owner resolution order:
//! 1) CLI --owner (clap also fills it from HABIT_OWNER)
//! 2) Persisted value in `<data_dir>/owner`
//! 3) Config default (account.default_owner)

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock;
use crate::storage::OWNER_FILE;

/// Resolve the current owner from the CLI value, the persisted file, and config.
pub fn resolve_owner(data_dir: &Path, cli_owner: Option<&str>, config: &Config) -> Result<String> {
    if let Some(owner) = non_empty(cli_owner) {
        return Ok(owner.to_string());
    }

    if let Some(owner) = load_persisted_owner(data_dir)? {
        return Ok(owner);
    }

    Ok(config.account.default_owner.trim().to_string())
}

/// Persist the owner identity in `<data_dir>/owner`.
pub fn persist_owner(data_dir: &Path, owner: &str) -> Result<String> {
    let owner = non_empty(Some(owner))
        .ok_or_else(|| Error::InvalidArgument("owner name cannot be empty".to_string()))?;

    lock::write_atomic(owner_path(data_dir), format!("{owner}\n").as_bytes())?;
    tracing::info!(owner, "persisted owner");
    Ok(owner.to_string())
}

/// Load the owner identity from `<data_dir>/owner`, if present.
pub fn load_persisted_owner(data_dir: &Path) -> Result<Option<String>> {
    let path = owner_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    Ok(non_empty(Some(raw.as_str())).map(str::to_string))
}

fn owner_path(data_dir: &Path) -> PathBuf {
    data_dir.join(OWNER_FILE)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|value| !value.is_empty())
}
