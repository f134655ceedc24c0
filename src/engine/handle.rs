// src/engine/handle.rs

use tokio::sync::mpsc;

use crate::engine::ShellEvent;
use crate::errors::{Result, SupervisorError};

/// Sender side of the shell event channel, handed to the host toolkit.
///
/// The toolkit calls [`app_ready`](Self::app_ready) once its window system
/// is up and [`before_quit`](Self::before_quit) before it destroys anything.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    tx: mpsc::Sender<ShellEvent>,
}

impl ShellHandle {
    pub fn new(tx: mpsc::Sender<ShellEvent>) -> Self {
        Self { tx }
    }

    pub async fn app_ready(&self) -> Result<()> {
        self.send(ShellEvent::Ready).await
    }

    pub async fn before_quit(&self) -> Result<()> {
        self.send(ShellEvent::BeforeQuit).await
    }

    async fn send(&self, event: ShellEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| SupervisorError::ChannelClosed)
    }
}
