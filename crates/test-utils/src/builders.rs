#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sidecar_supervisor::config::{ConfigFile, RawConfigFile};
use sidecar_supervisor::locate::CandidateList;
use sidecar_supervisor::supervisor::SupervisorSettings;
use sidecar_supervisor::types::DeploymentMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn mode(mut self, mode: DeploymentMode) -> Self {
        self.config.shell.mode = Some(mode);
        self
    }

    pub fn resources_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.shell.resources_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn notify_on_unexpected_exit(mut self, val: bool) -> Self {
        self.config.shell.notify_on_unexpected_exit = val;
        self
    }

    pub fn executable(mut self, name: &str) -> Self {
        self.config.backend.executable = name.to_string();
        self
    }

    /// Replace the default layouts with exactly these.
    pub fn layouts(mut self, layouts: &[&str]) -> Self {
        self.config.backend.layouts = layouts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.config.backend.args.push(arg.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.config
            .backend
            .env
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Supervisor settings with an explicit candidate list.
pub fn settings(mode: DeploymentMode, candidates: &[&str]) -> SupervisorSettings {
    let paths = candidates.iter().map(PathBuf::from).collect();
    SupervisorSettings {
        mode,
        candidates: CandidateList::new(paths).expect("candidate list must not be empty"),
        args: Vec::new(),
        env: Default::default(),
        notify_on_unexpected_exit: false,
    }
}
