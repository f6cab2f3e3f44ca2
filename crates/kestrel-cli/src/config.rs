//! Asset directory resolution.
//!
//! Persisted assets live in one directory, one `<platform>.yaml` each. The
//! directory is resolved (highest priority first):
//! 1. Explicit `--asset-dir` flag
//! 2. `KESTREL_ASSET_DIR` environment variable
//! 3. `~/.kestrel/assets`

use std::path::PathBuf;

use kestrel_common::{ASSET_DIR_ENV, ASSET_DIR_NAME, STATE_DIR_NAME};

use crate::{Error, Result};

/// Resolve the asset directory using the priority chain.
///
/// The directory is not created here; the file store creates it on first write.
pub fn resolve_asset_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Ok(path) = std::env::var(ASSET_DIR_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    default_asset_dir()
}

/// `~/.kestrel/assets`
pub fn default_asset_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::command_failed("could not determine home directory"))?;
    Ok(home.join(STATE_DIR_NAME).join(ASSET_DIR_NAME))
}
