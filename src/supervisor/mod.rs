// src/supervisor/mod.rs

//! Backend process supervisor.
//!
//! Owns the single backend process for the lifetime of the shell: locates
//! the executable, spawns it in its own directory, reacts to its events and
//! terminates it on request. No failure in here ever escapes to the caller;
//! problems are logged and, for the two fatal cases, surfaced through the
//! [`Notifier`].

pub mod notify;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::config::ConfigFile;
use crate::engine::{Generation, ProcessEvent};
use crate::errors::{Result, SupervisorError};
use crate::exec::{LaunchRequest, ProcessBackend, ProcessHandle};
use crate::fs::FileSystem;
use crate::locate::{locate, working_dir_for, CandidateList};
use crate::types::DeploymentMode;

pub use notify::{ExitNotice, FatalNotice, Notifier, StderrNotifier};

/// Supervisor lifecycle.
///
/// `Idle -> Starting -> Running -> Stopped`, with `Starting -> Stopped` on
/// locate or spawn failure. Development mode never leaves `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Starting,
    Running,
    Stopped,
}

/// Fixed inputs for one run of the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub mode: DeploymentMode,
    pub candidates: CandidateList,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub notify_on_unexpected_exit: bool,
}

impl SupervisorSettings {
    pub fn from_config(cfg: &ConfigFile, mode: DeploymentMode, resources_dir: &Path) -> Result<Self> {
        let candidates =
            CandidateList::from_layouts(&cfg.backend.layouts, resources_dir, &cfg.backend.executable)?;

        Ok(Self {
            mode,
            candidates,
            args: cfg.backend.args.clone(),
            env: cfg.backend.env.clone(),
            notify_on_unexpected_exit: cfg.shell.notify_on_unexpected_exit,
        })
    }
}

pub struct Supervisor<B: ProcessBackend, N: Notifier> {
    settings: SupervisorSettings,
    fs: Box<dyn FileSystem>,
    backend: B,
    notifier: N,
    state: SupervisorState,
    current: Option<ProcessHandle>,
    last_generation: Generation,
}

impl<B: ProcessBackend, N: Notifier> fmt::Debug for Supervisor<B, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("mode", &self.settings.mode)
            .field("state", &self.state)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend, N: Notifier> Supervisor<B, N> {
    pub fn new(
        settings: SupervisorSettings,
        fs: Box<dyn FileSystem>,
        backend: B,
        notifier: N,
    ) -> Self {
        Self {
            settings,
            fs,
            backend,
            notifier,
            state: SupervisorState::Idle,
            current: None,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn mode(&self) -> DeploymentMode {
        self.settings.mode
    }

    /// The live backend process, if any.
    pub fn current(&self) -> Option<&ProcessHandle> {
        self.current.as_ref()
    }

    /// Give up the supervisor and keep its process backend, e.g. to wait
    /// for a stopped process on the way out.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Locate and spawn the backend.
    ///
    /// Returns as soon as the spawn call does; readiness to serve requests is
    /// not awaited. A second call while a process is live is ignored.
    pub fn start(&mut self) {
        match self.state {
            SupervisorState::Starting | SupervisorState::Running => {
                warn!(
                    state = ?self.state,
                    current = ?self.current.as_ref().map(|h| h.generation),
                    "backend already started; ignoring start request"
                );
                return;
            }
            SupervisorState::Idle | SupervisorState::Stopped => {}
        }

        if !self.settings.mode.is_packaged() {
            info!("development mode: backend is managed externally, not spawning it");
            return;
        }

        self.state = SupervisorState::Starting;

        let program = match locate(self.fs.as_ref(), &self.settings.candidates) {
            Ok(program) => program,
            Err(not_found) => {
                error!(error = %not_found, "cannot start backend");
                self.fail(FatalNotice::ExecutableNotFound {
                    candidates: not_found.candidates,
                });
                return;
            }
        };

        self.last_generation += 1;
        let request = LaunchRequest {
            generation: self.last_generation,
            program: program.clone(),
            args: self.settings.args.clone(),
            working_dir: working_dir_for(&program),
            env: self.settings.env.clone(),
        };

        match self.backend.spawn(request) {
            Ok(handle) => {
                info!(
                    generation = handle.generation,
                    pid = ?handle.pid,
                    program = %program.display(),
                    "backend process spawned"
                );
                self.current = Some(handle);
            }
            Err(err) => {
                let detail = match &err {
                    SupervisorError::SpawnFailed { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                error!(program = %program.display(), error = %detail, "failed to spawn backend");
                self.fail(FatalNotice::SpawnFailed { program, detail });
            }
        }
    }

    /// Terminate the backend if one is live. Safe to call at any time.
    ///
    /// Does not wait for the process to exit and does not escalate when the
    /// termination request is not acknowledged.
    pub fn stop(&mut self) {
        let Some(handle) = self.current.take() else {
            debug!(state = ?self.state, "no backend process to stop");
            return;
        };

        info!(
            generation = handle.generation,
            pid = ?handle.pid,
            program = %handle.program.display(),
            "stopping backend process"
        );
        if let Err(e) = self.backend.terminate(&handle) {
            warn!(
                generation = handle.generation,
                error = %e,
                "backend did not acknowledge termination; continuing"
            );
        }

        self.state = SupervisorState::Stopped;
    }

    /// React to an event from the process layer.
    ///
    /// Events for a process other than the current one are stale (it was
    /// stopped or already exited) and never change state.
    pub fn handle_event(&mut self, event: ProcessEvent) {
        let is_current = self
            .current
            .as_ref()
            .is_some_and(|h| h.generation == event.generation());

        match event {
            ProcessEvent::OutputLine { generation, line } => {
                if is_current {
                    info!(target: "backend", generation, "{line}");
                } else {
                    debug!(target: "backend", generation, stale = true, "{line}");
                }
            }
            ProcessEvent::ErrorLine { generation, line } => {
                if is_current {
                    warn!(target: "backend", generation, "{line}");
                } else {
                    debug!(target: "backend", generation, stale = true, "{line}");
                }
            }
            _ if !is_current => {
                debug!(?event, "ignoring event for a backend process that is no longer current");
            }
            ProcessEvent::Started { generation, pid } => {
                if let Some(handle) = self.current.as_mut() {
                    handle.pid = handle.pid.or(pid);
                }
                if self.state == SupervisorState::Starting {
                    self.state = SupervisorState::Running;
                }
                info!(generation, ?pid, "backend process running");
            }
            ProcessEvent::Exited { generation, code } => {
                let pid = self.current.take().and_then(|h| h.pid);
                self.state = SupervisorState::Stopped;

                match code {
                    Some(0) => info!(generation, ?pid, "backend process exited"),
                    Some(code) => {
                        error!(
                            generation,
                            ?pid,
                            code,
                            "backend process exited unexpectedly; it will not be restarted"
                        );
                        if self.settings.notify_on_unexpected_exit {
                            self.notifier.backend_exited(&ExitNotice {
                                pid,
                                code: Some(code),
                            });
                        }
                    }
                    None => warn!(generation, ?pid, "backend process was terminated by a signal"),
                }
            }
        }
    }

    fn fail(&mut self, notice: FatalNotice) {
        self.current = None;
        self.state = SupervisorState::Stopped;
        self.notifier.fatal(&notice);
    }
}
