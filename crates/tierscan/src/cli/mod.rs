//! Command handlers.

pub mod config;
pub mod discover;
pub mod run;

use std::path::{Path, PathBuf};
use tierscan_core::Config;

/// Load configuration for a command.
///
/// An explicit file must load cleanly. The default location falls back to
/// built-in defaults with a warning, since a fresh install has no file.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load_from(&expand(path))?);
    }

    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tierscan config path`."
            );
            Ok(Config::default())
        }
    }
}

/// Expand a leading `~` in a path given on the command line.
pub fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}
