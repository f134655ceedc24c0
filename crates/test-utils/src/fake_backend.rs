use std::io;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use sidecar_supervisor::engine::{Generation, ProcessEvent, ShellEvent};
use sidecar_supervisor::errors::{Result, SupervisorError};
use sidecar_supervisor::exec::{LaunchRequest, ProcessBackend, ProcessHandle};

/// What the fake backend was asked to do.
#[derive(Debug, Default, Clone)]
pub struct BackendLog {
    pub launches: Vec<LaunchRequest>,
    pub terminations: Vec<Generation>,
}

/// A fake process backend that:
/// - records every launch request and termination
/// - optionally refuses to spawn with a given OS error kind
/// - optionally reports `Started` (and `Exited` after termination) on the
///   shell event channel, like the real backend's watcher task would.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessBackend {
    log: Arc<Mutex<BackendLog>>,
    events: Option<mpsc::Sender<ShellEvent>>,
    spawn_error: Option<io::ErrorKind>,
}

impl FakeProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit process events on this channel.
    pub fn with_events(mut self, events: mpsc::Sender<ShellEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Fail every spawn with this error kind.
    pub fn failing(mut self, kind: io::ErrorKind) -> Self {
        self.spawn_error = Some(kind);
        self
    }

    /// Shared view of the recorded calls.
    pub fn log(&self) -> Arc<Mutex<BackendLog>> {
        Arc::clone(&self.log)
    }

    pub fn launches(&self) -> Vec<LaunchRequest> {
        self.log.lock().unwrap().launches.clone()
    }

    pub fn terminations(&self) -> Vec<Generation> {
        self.log.lock().unwrap().terminations.clone()
    }

    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.events {
            tx.try_send(ShellEvent::Process(event))
                .expect("fake backend event channel full or closed");
        }
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn spawn(&mut self, request: LaunchRequest) -> Result<ProcessHandle> {
        if let Some(kind) = self.spawn_error {
            return Err(SupervisorError::SpawnFailed {
                program: request.program,
                source: io::Error::new(kind, "fake spawn failure"),
            });
        }

        let generation = request.generation;
        let pid = Some(40_000 + generation as u32);
        let program = request.program.clone();
        self.log.lock().unwrap().launches.push(request);

        self.emit(ProcessEvent::Started { generation, pid });

        Ok(ProcessHandle {
            generation,
            program,
            pid,
        })
    }

    fn terminate(&mut self, handle: &ProcessHandle) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .terminations
            .push(handle.generation);

        self.emit(ProcessEvent::Exited {
            generation: handle.generation,
            code: None,
        });
        Ok(())
    }
}
