use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default database location under the platform data directory,
/// e.g. `~/.local/share/session-importer/conversations.db3` on Linux.
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("could not determine platform data directory")?;
    Ok(data_dir.join("session-importer").join("conversations.db3"))
}
