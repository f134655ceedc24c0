// src/engine/mod.rs

//! Shell lifecycle engine.
//!
//! Everything that can change the supervisor's state arrives as a
//! [`ShellEvent`] on a single mpsc channel:
//! - lifecycle events from the host toolkit (`Ready`, `BeforeQuit`)
//! - process events from the backend's watcher task
//!
//! The pure lifecycle state machine lives in [`lifecycle`]; the async IO
//! shell that drains the channel is implemented in [`runtime`].

/// Identity of one spawned backend process.
///
/// Every spawn gets a fresh value, so an event carrying an older generation
/// belongs to a process the supervisor no longer owns.
pub type Generation = u64;

/// Notifications about a spawned backend process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// The OS confirmed a live process.
    Started {
        generation: Generation,
        pid: Option<u32>,
    },
    /// One line of the backend's standard output.
    OutputLine { generation: Generation, line: String },
    /// One line of the backend's standard error.
    ErrorLine { generation: Generation, line: String },
    /// The process ended. `code` is `None` when it was killed by a signal.
    Exited {
        generation: Generation,
        code: Option<i32>,
    },
}

impl ProcessEvent {
    pub fn generation(&self) -> Generation {
        match self {
            ProcessEvent::Started { generation, .. }
            | ProcessEvent::OutputLine { generation, .. }
            | ProcessEvent::ErrorLine { generation, .. }
            | ProcessEvent::Exited { generation, .. } => *generation,
        }
    }
}

/// Events flowing into the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The host toolkit finished initialising.
    Ready,
    /// The host is about to quit; nothing has been torn down yet.
    BeforeQuit,
    /// Something happened to the backend process.
    Process(ProcessEvent),
}

pub mod handle;
pub mod lifecycle;
pub mod runtime;

pub use handle::ShellHandle;
pub use lifecycle::{LifecycleCommand, LifecycleController, LifecycleState, LifecycleStep};
pub use runtime::Runtime;
