// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Default config file name, looked up in the current working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Sidecar.toml";

/// Read and deserialize a config file without semantic validation.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a config file and validate it.
///
/// This is the entry point the rest of the application uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(&RealFileSystem, path)?;
    ConfigFile::try_from(raw)
}

/// Resolve the config the shell should run with.
///
/// - An explicit path must exist and parse.
/// - Without one, [`DEFAULT_CONFIG_FILE`] is used when present and the
///   built-in defaults otherwise.
pub fn load_or_default(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = default_config_path();
            if !fs.exists(&default) {
                debug!(path = ?default, "no config file found; using built-in defaults");
                return Ok(ConfigFile::default());
            }
            default
        }
    };

    debug!(?path, "loading config file");
    let raw = load_from_path(fs, &path)?;
    ConfigFile::try_from(raw)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
