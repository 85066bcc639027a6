//! Configuration loading
//!
//! Settings come from `config.toml`. Every field has a default, so an empty
//! or missing default file yields the built-in tuning.

use crate::duplicates::FinderConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duplicate finder tuning
    pub duplicates: FinderConfig,
}

/// Default config location: `<config dir>/lexmerge/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lexmerge").join("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and built-in defaults are used if nothing is there.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
