// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::DeploymentMode;

/// Command-line arguments for `sidecar-supervisor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sidecar-supervisor",
    version,
    about = "Run a desktop shell's bundled backend service and stop it when the shell quits.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sidecar.toml` in the current working directory if it
    /// exists, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deployment mode. Overrides `SIDECAR_MODE` and the config file.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<DeploymentMode>,

    /// Directory the `{resources}` layout placeholder expands to.
    #[arg(long, value_name = "DIR")]
    pub resources_dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SIDECAR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved settings and candidate paths, but don't spawn
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
