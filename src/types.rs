use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Whether the shell runs from a development workspace or as an installed
/// application bundle.
///
/// - `Development`: the backend is started out-of-band by the developer, so
///   the supervisor never locates or spawns anything.
/// - `Packaged`: the supervisor locates the bundled backend executable and
///   owns its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    Packaged,
}

impl DeploymentMode {
    /// Mode implied by the build profile when nothing else decides it.
    pub fn from_build_profile() -> Self {
        if cfg!(debug_assertions) {
            DeploymentMode::Development
        } else {
            DeploymentMode::Packaged
        }
    }

    pub fn is_packaged(self) -> bool {
        self == DeploymentMode::Packaged
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Development => f.write_str("development"),
            DeploymentMode::Packaged => f.write_str("packaged"),
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(DeploymentMode::Development),
            "packaged" | "production" | "prod" => Ok(DeploymentMode::Packaged),
            other => Err(format!(
                "invalid deployment mode: {other} (expected \"development\" or \"packaged\")"
            )),
        }
    }
}
