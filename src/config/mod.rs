//! Configuration Management
//!
//! This module locates and loads the data source definition.
//!
//! # Configuration Locations
//! - Local: `.records/config.json` (per working directory)
//! - Global: `~/.config/records/config.json` (per user)
//!
//! # Resolution Precedence
//! 1. Explicit `--config <file>` (highest priority)
//! 2. Explicit `--database <path>`
//! 3. Local config file (`.records/config.json`)
//! 4. Global config file (`~/.config/records/config.json`)
//!
//! # File Format
//! ```json
//! {
//!   "driver": "sqlite",
//!   "url": "sqlite:/srv/records/university.db",
//!   "username": "",
//!   "password_env": "RECORDS_DB_PASSWORD"
//! }
//! ```
//! Only `url` is required.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::engine::DataSourceConfig;
use crate::error::{RecordsError, Result};

/// Configuration file location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Local config: `.records/config.json`
    Local,
    /// Global config: `~/.config/records/config.json`
    Global,
}

impl ConfigLocation {
    /// Path of the config file for this location
    pub fn path(self) -> Result<PathBuf> {
        match self {
            Self::Local => local_config_path(),
            Self::Global => global_config_path(),
        }
    }
}

/// Explicit overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

/// Get path to local config file (`.records/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        RecordsError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".records").join("config.json"))
}

/// Get path to global config file (`~/.config/records/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RecordsError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("records").join("config.json"))
}

/// Load a data source definition from a config file
pub fn load_config(path: &Path) -> Result<DataSourceConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        RecordsError::config_error(format!("Could not read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents)
        .map_err(|e| RecordsError::config_error(format!("Invalid config file format: {e}")))
}

/// Save a data source definition, creating parent directories as needed
pub fn save_config(path: &Path, config: &DataSourceConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            RecordsError::config_error(format!("Could not create config directory: {e}"))
        })?;
    }

    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| RecordsError::config_error(format!("Could not serialize config: {e}")))?;

    fs::write(path, contents)
        .map_err(|e| RecordsError::config_error(format!("Could not write config file: {e}")))?;

    Ok(())
}

/// Resolve the data source with precedence (explicit, local, then global)
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<DataSourceConfig> {
    let local = local_config_path()?;
    let global = global_config_path().ok();
    resolve_from(overrides, &local, global.as_deref())
}

/// Resolve against given local/global paths
///
/// A config file that exists but cannot be loaded is skipped with a warning.
/// If no candidate is usable, the first load error is returned.
pub fn resolve_from(
    overrides: &ConfigOverrides,
    local: &Path,
    global: Option<&Path>,
) -> Result<DataSourceConfig> {
    if let Some(file) = &overrides.config_file {
        debug!(path = %file.display(), "using explicit config file");
        return load_config(file);
    }

    if let Some(database) = &overrides.database {
        debug!(path = %database.display(), "using explicit database path");
        return Ok(DataSourceConfig::sqlite(database));
    }

    let mut unusable = None;
    for candidate in std::iter::once(local).chain(global) {
        if !candidate.exists() {
            continue;
        }
        match load_config(candidate) {
            Ok(config) => {
                debug!(path = %candidate.display(), "using config file");
                return Ok(config);
            }
            Err(err) => {
                warn!(path = %candidate.display(), error = %err, "skipping unusable config file");
                unusable.get_or_insert(err);
            }
        }
    }

    Err(unusable.unwrap_or_else(|| {
        RecordsError::config_error(
            "No data source configured. Pass --database, --config, or run 'records connect'.",
        )
    }))
}
