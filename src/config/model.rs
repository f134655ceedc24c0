// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::client::BackendClientConfig;
use crate::locate::DEFAULT_LAYOUTS;
use crate::types::DeploymentMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [shell]
/// mode = "packaged"
/// resources_dir = "/opt/finance/resources"
///
/// [backend]
/// executable = "api.exe"
/// layouts = [
///     "{resources}/{executable}",
///     "{resources}/app.asar.unpacked/{executable}",
///     "{resources}/resources/{executable}",
/// ]
///
/// [client]
/// base_url = "http://127.0.0.1:8000"
/// timeout = "10s"
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub shell: ShellSection,

    #[serde(default)]
    pub backend: BackendSection,

    #[serde(default)]
    pub client: BackendClientConfig,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holding one means the layouts and client parameters were checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub shell: ShellSection,
    pub backend: BackendSection,
    pub client: BackendClientConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        shell: ShellSection,
        backend: BackendSection,
        client: BackendClientConfig,
    ) -> Self {
        Self {
            shell,
            backend,
            client,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.shell, raw.backend, raw.client)
    }
}

/// `[shell]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Deployment mode; when absent it comes from the environment or the
    /// build profile.
    pub mode: Option<DeploymentMode>,

    /// Root the `{resources}` placeholder expands to. Defaults to the
    /// directory containing the shell executable.
    pub resources_dir: Option<PathBuf>,

    /// Also raise a non-blocking notice when the backend exits on its own
    /// with a failure code. Off by default: such exits are only logged.
    pub notify_on_unexpected_exit: bool,
}

/// `[backend]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// File name substituted for `{executable}`.
    pub executable: String,

    /// Extra arguments passed to the backend.
    pub args: Vec<String>,

    /// Extra environment variables for the backend.
    pub env: BTreeMap<String, String>,

    /// Layout templates, highest priority first.
    pub layouts: Vec<String>,
}

pub fn default_executable_name() -> String {
    if cfg!(windows) {
        "api.exe".to_string()
    } else {
        "api".to_string()
    }
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            executable: default_executable_name(),
            args: Vec::new(),
            env: BTreeMap::new(),
            layouts: DEFAULT_LAYOUTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
