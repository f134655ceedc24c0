// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! itself. Production code uses [`RealProcessBackend`]; tests provide a fake
//! that records launches and terminations without touching the OS.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{Generation, ShellEvent};
use crate::errors::{Result, SupervisorError};
use crate::exec::process_runner::watch_process;

/// Everything needed to launch one backend process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub generation: Generation,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
}

/// Handle to a live backend process, owned by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub generation: Generation,
    pub program: PathBuf,
    pub pid: Option<u32>,
}

/// How backend processes are started and stopped.
pub trait ProcessBackend: Send {
    /// Launch a process. An `Err` means the OS refused to create it.
    ///
    /// On success the backend reports later lifecycle changes as
    /// `ShellEvent::Process` events tagged with `request.generation`.
    fn spawn(&mut self, request: LaunchRequest) -> Result<ProcessHandle>;

    /// Ask a process to terminate. Best effort: never waits for the exit.
    fn terminate(&mut self, handle: &ProcessHandle) -> Result<()>;
}

/// Backend that runs real OS processes through `tokio::process`.
///
/// Each child is owned by its own watcher task. The backend keeps a cancel
/// sender per generation; firing it asks the child to shut down, and dropping
/// the backend drops every sender, which does the same for every child it
/// still owns. `kill_on_drop` kills whatever is left when the runtime goes
/// away.
#[derive(Debug)]
pub struct RealProcessBackend {
    events: mpsc::Sender<ShellEvent>,
    active: HashMap<Generation, oneshot::Sender<()>>,
    watchers: Vec<JoinHandle<()>>,
}

impl RealProcessBackend {
    pub fn new(events: mpsc::Sender<ShellEvent>) -> Self {
        Self {
            events,
            active: HashMap::new(),
            watchers: Vec::new(),
        }
    }

    /// Wait up to `grace` for every process this backend started to exit.
    ///
    /// Processes not yet asked to terminate are asked now. Whatever is still
    /// running when the grace period ends is killed.
    pub async fn shutdown(mut self, grace: Duration) {
        self.active.clear();

        let watchers = std::mem::take(&mut self.watchers);
        let aborts: Vec<_> = watchers.iter().map(JoinHandle::abort_handle).collect();

        let finished = tokio::time::timeout(grace, async {
            for watcher in watchers {
                if let Err(e) = watcher.await {
                    warn!(error = %e, "backend watcher task failed");
                }
            }
        })
        .await;

        if finished.is_err() {
            warn!(?grace, "backend still running after shutdown grace period; killing it");
            // Dropping a watcher drops its child, and `kill_on_drop` does the rest.
            for abort in aborts {
                abort.abort();
            }
        }
    }
}

impl ProcessBackend for RealProcessBackend {
    fn spawn(&mut self, request: LaunchRequest) -> Result<ProcessHandle> {
        // Forget processes whose watcher already finished.
        self.active.retain(|_, cancel| !cancel.is_closed());
        self.watchers.retain(|watcher| !watcher.is_finished());

        info!(
            generation = request.generation,
            program = %request.program.display(),
            cwd = %request.working_dir.display(),
            "spawning backend process"
        );

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .envs(&request.env)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so termination reaches forked workers too.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| SupervisorError::SpawnFailed {
            program: request.program.clone(),
            source,
        })?;

        let pid = child.id();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let watcher = tokio::spawn(watch_process(
            child,
            request.generation,
            self.events.clone(),
            cancel_rx,
        ));

        self.active.insert(request.generation, cancel_tx);
        self.watchers.push(watcher);

        Ok(ProcessHandle {
            generation: request.generation,
            program: request.program,
            pid,
        })
    }

    fn terminate(&mut self, handle: &ProcessHandle) -> Result<()> {
        let Some(cancel) = self.active.remove(&handle.generation) else {
            return Err(anyhow::anyhow!(
                "no running process for generation {}",
                handle.generation
            )
            .into());
        };

        if cancel.send(()).is_err() {
            debug!(
                generation = handle.generation,
                "process already finished while terminating"
            );
            return Err(anyhow::anyhow!(
                "process for generation {} already exited",
                handle.generation
            )
            .into());
        }

        Ok(())
    }
}
