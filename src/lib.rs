// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod locate;
pub mod logging;
pub mod supervisor;
pub mod types;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::client::BackendClientConfig;
use crate::config::{load_or_default, resolve_mode, resolve_resources_dir, ConfigFile, MODE_ENV_VAR};
use crate::engine::{LifecycleController, Runtime, ShellEvent, ShellHandle};
use crate::exec::RealProcessBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::locate::locate;
use crate::supervisor::{StderrNotifier, Supervisor, SupervisorSettings};

/// How long a stopped backend gets to exit before the shell kills it and
/// exits anyway.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and mode / resources resolution
/// - the supervisor with the real process backend
/// - the lifecycle runtime
/// - Ctrl-C handling, standing in for the toolkit's before-quit event
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&RealFileSystem, args.config.as_deref())?;

    let env_mode = std::env::var(MODE_ENV_VAR).ok();
    let mode = resolve_mode(args.mode, env_mode.as_deref(), &cfg.shell);
    let resources_dir = resolve_resources_dir(args.resources_dir.clone(), &cfg.shell);
    let settings = SupervisorSettings::from_config(&cfg, mode, &resources_dir)?;

    if args.dry_run {
        print_dry_run(&cfg, &settings, &resources_dir, &RealFileSystem);
        return Ok(());
    }

    log_client_contract(&cfg.client);

    let (tx, rx) = mpsc::channel::<ShellEvent>(64);
    let shell = ShellHandle::new(tx.clone());

    let backend = RealProcessBackend::new(tx);
    let supervisor = Supervisor::new(
        settings,
        Box::new(RealFileSystem),
        backend,
        StderrNotifier,
    );
    let runtime = Runtime::new(LifecycleController::new(), supervisor, rx);

    // Ctrl-C → before-quit.
    {
        let shell = shell.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = shell.before_quit().await;
        });
    }

    // No window toolkit is attached, so the application is ready as soon as
    // the runtime exists.
    shell.app_ready().await?;

    let supervisor = runtime.run().await?;
    supervisor.into_backend().shutdown(SHUTDOWN_GRACE).await;
    Ok(())
}

fn log_client_contract(client: &BackendClientConfig) {
    info!(
        base_url = %client.base_url,
        timeout = ?client.timeout,
        content_type = %client.content_type,
        "backend client contract"
    );
}

/// Dry-run output: resolved settings, every candidate and which one wins.
fn print_dry_run(
    cfg: &ConfigFile,
    settings: &SupervisorSettings,
    resources_dir: &Path,
    fs: &dyn FileSystem,
) {
    println!("sidecar-supervisor dry-run");
    println!("  mode = {}", settings.mode);
    println!("  resources_dir = {}", resources_dir.display());
    println!("  executable = {}", cfg.backend.executable);
    if !settings.args.is_empty() {
        println!("  args = {:?}", settings.args);
    }
    println!();

    println!("candidates ({}):", settings.candidates.len());
    for candidate in settings.candidates.iter() {
        let marker = if fs.is_file(candidate) { "found" } else { "missing" };
        println!("  - [{marker}] {}", candidate.display());
    }
    println!();

    match locate(fs, &settings.candidates) {
        Ok(path) => println!("resolved: {}", path.display()),
        Err(e) => println!("resolved: none ({e})"),
    }
    if !settings.mode.is_packaged() {
        println!("  (development mode: the backend would not be spawned)");
    }
    println!();

    println!("client:");
    println!("  base_url = {}", cfg.client.base_url);
    println!("  timeout = {:?}", cfg.client.timeout);
    println!("  content_type = {}", cfg.client.content_type);
}
