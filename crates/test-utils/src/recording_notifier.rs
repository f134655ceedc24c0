use std::sync::{Arc, Mutex};

use sidecar_supervisor::supervisor::{ExitNotice, FatalNotice, Notifier};

/// Notifier that keeps every notice instead of showing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    fatal: Arc<Mutex<Vec<FatalNotice>>>,
    exits: Arc<Mutex<Vec<ExitNotice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fatal_notices(&self) -> Vec<FatalNotice> {
        self.fatal.lock().unwrap().clone()
    }

    pub fn exit_notices(&self) -> Vec<ExitNotice> {
        self.exits.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn fatal(&self, notice: &FatalNotice) {
        self.fatal.lock().unwrap().push(notice.clone());
    }

    fn backend_exited(&self, notice: &ExitNotice) {
        self.exits.lock().unwrap().push(*notice);
    }
}
