// src/engine/lifecycle.rs

//! Pure shell lifecycle state machine.
//!
//! Consumes [`ShellEvent`]s and answers with the commands the IO shell
//! (`engine::runtime::Runtime`) should run against the supervisor. It owns
//! no channels, no processes and performs no IO, so it is unit tested
//! directly.

use tracing::{debug, warn};

use crate::engine::{ProcessEvent, ShellEvent};

/// Where the host application is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotReady,
    Ready,
    ShuttingDown,
}

/// Command produced by the controller, executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// Call `Supervisor::start`.
    StartBackend,
    /// Call `Supervisor::stop`.
    StopBackend,
    /// Hand a process event to the supervisor.
    Forward(ProcessEvent),
}

/// Decision returned for a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleStep {
    pub commands: Vec<LifecycleCommand>,
    /// Whether the runtime loop should keep draining events.
    pub keep_running: bool,
}

impl LifecycleStep {
    fn keep(commands: Vec<LifecycleCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct LifecycleController {
    state: LifecycleState,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleController {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::NotReady,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn step(&mut self, event: ShellEvent) -> LifecycleStep {
        match (self.state, event) {
            (LifecycleState::NotReady, ShellEvent::Ready) => {
                self.state = LifecycleState::Ready;
                LifecycleStep::keep(vec![LifecycleCommand::StartBackend])
            }
            (state, ShellEvent::Ready) => {
                warn!(?state, "duplicate ready event ignored");
                LifecycleStep::keep(Vec::new())
            }

            (LifecycleState::ShuttingDown, ShellEvent::BeforeQuit) => {
                debug!("already shutting down");
                LifecycleStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
            (_, ShellEvent::BeforeQuit) => {
                // Stop must be issued even if the app quits before it was
                // ever ready; the supervisor treats it as a no-op then.
                self.state = LifecycleState::ShuttingDown;
                LifecycleStep {
                    commands: vec![LifecycleCommand::StopBackend],
                    keep_running: false,
                }
            }

            (_, ShellEvent::Process(event)) => {
                LifecycleStep::keep(vec![LifecycleCommand::Forward(event)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_starts_backend_once() {
        let mut ctl = LifecycleController::new();

        let first = ctl.step(ShellEvent::Ready);
        assert_eq!(first.commands, vec![LifecycleCommand::StartBackend]);
        assert!(first.keep_running);
        assert_eq!(ctl.state(), LifecycleState::Ready);

        let second = ctl.step(ShellEvent::Ready);
        assert!(second.commands.is_empty());
        assert!(second.keep_running);
    }

    #[test]
    fn before_quit_stops_backend_and_ends_loop() {
        let mut ctl = LifecycleController::new();
        ctl.step(ShellEvent::Ready);

        let step = ctl.step(ShellEvent::BeforeQuit);
        assert_eq!(step.commands, vec![LifecycleCommand::StopBackend]);
        assert!(!step.keep_running);
        assert_eq!(ctl.state(), LifecycleState::ShuttingDown);
    }

    #[test]
    fn before_quit_without_ready_still_stops() {
        let mut ctl = LifecycleController::new();
        let step = ctl.step(ShellEvent::BeforeQuit);
        assert_eq!(step.commands, vec![LifecycleCommand::StopBackend]);
    }

    #[test]
    fn ready_after_shutdown_does_not_start() {
        let mut ctl = LifecycleController::new();
        ctl.step(ShellEvent::BeforeQuit);

        let step = ctl.step(ShellEvent::Ready);
        assert!(step.commands.is_empty());
        assert_eq!(ctl.state(), LifecycleState::ShuttingDown);

        let again = ctl.step(ShellEvent::BeforeQuit);
        assert!(again.commands.is_empty());
    }

    #[test]
    fn process_events_are_forwarded() {
        let mut ctl = LifecycleController::new();
        let event = ProcessEvent::Exited {
            generation: 1,
            code: Some(3),
        };

        let step = ctl.step(ShellEvent::Process(event.clone()));
        assert_eq!(step.commands, vec![LifecycleCommand::Forward(event)]);
    }
}
