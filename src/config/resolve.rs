// src/config/resolve.rs

//! Runtime settings derived from CLI flags, environment and config.

use std::path::PathBuf;

use tracing::warn;

use crate::config::model::ShellSection;
use crate::types::DeploymentMode;

/// Environment variable that overrides the deployment mode.
pub const MODE_ENV_VAR: &str = "SIDECAR_MODE";

/// Decide the deployment mode.
///
/// Priority:
/// 1. `--mode` CLI flag
/// 2. `SIDECAR_MODE` environment variable (passed in as `env_value`)
/// 3. `[shell].mode` from the config file
/// 4. the build profile
pub fn resolve_mode(
    cli: Option<DeploymentMode>,
    env_value: Option<&str>,
    shell: &ShellSection,
) -> DeploymentMode {
    if let Some(mode) = cli {
        return mode;
    }

    if let Some(raw) = env_value {
        match raw.parse::<DeploymentMode>() {
            Ok(mode) => return mode,
            Err(e) => warn!(var = MODE_ENV_VAR, error = %e, "ignoring invalid deployment mode"),
        }
    }

    shell.mode.unwrap_or_else(DeploymentMode::from_build_profile)
}

/// Decide the directory `{resources}` expands to.
///
/// Priority: `--resources-dir`, `[shell].resources_dir`, then the directory
/// containing the running shell executable.
///
/// A relative directory is anchored at the current working directory. The
/// backend is spawned inside its own directory, so a relative program path
/// would otherwise be resolved twice.
pub fn resolve_resources_dir(cli: Option<PathBuf>, shell: &ShellSection) -> PathBuf {
    let dir = cli
        .or_else(|| shell.resources_dir.clone())
        .unwrap_or_else(executable_dir);

    match std::path::absolute(&dir) {
        Ok(abs) => abs,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot make resources dir absolute");
            dir
        }
    }
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
