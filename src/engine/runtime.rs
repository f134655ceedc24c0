// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::supervisor::{Notifier, Supervisor};

use super::lifecycle::LifecycleController;
use super::{LifecycleCommand, ShellEvent};

/// Drives the supervisor from `ShellEvent`s.
///
/// This is the IO shell around `LifecycleController`: it drains the single
/// event channel, feeds each event to the controller and applies the
/// resulting commands to the supervisor. All supervisor mutation happens on
/// this one task.
pub struct Runtime<B: ProcessBackend, N: Notifier> {
    controller: LifecycleController,
    supervisor: Supervisor<B, N>,
    event_rx: mpsc::Receiver<ShellEvent>,
}

impl<B: ProcessBackend, N: Notifier> fmt::Debug for Runtime<B, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("controller", &self.controller)
            .field("supervisor", &self.supervisor)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend, N: Notifier> Runtime<B, N> {
    pub fn new(
        controller: LifecycleController,
        supervisor: Supervisor<B, N>,
        event_rx: mpsc::Receiver<ShellEvent>,
    ) -> Self {
        Self {
            controller,
            supervisor,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// Returns after `BeforeQuit` has been handled, or when every sender is
    /// gone. In the latter case the backend is stopped first so it never
    /// outlives the shell. The supervisor is handed back for inspection.
    pub async fn run(mut self) -> Result<Supervisor<B, N>> {
        info!(mode = %self.supervisor.mode(), "shell runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("shell event channel closed; stopping backend");
                    self.supervisor.stop();
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.controller.step(event);

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("shell is quitting; leaving runtime loop");
                break;
            }
        }

        info!("runtime exiting");
        Ok(self.supervisor)
    }

    fn execute_command(&mut self, command: LifecycleCommand) {
        match command {
            LifecycleCommand::StartBackend => self.supervisor.start(),
            LifecycleCommand::StopBackend => self.supervisor.stop(),
            LifecycleCommand::Forward(event) => self.supervisor.handle_event(event),
        }
    }
}
