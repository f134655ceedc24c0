// src/exec/process_runner.rs

//! Watcher task for a single backend process.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{Generation, ProcessEvent, ShellEvent};
use crate::exec::signal::request_termination;

/// How long to keep reading output after the child exited. Descendants
/// that inherited the pipes can hold them open indefinitely.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Own a spawned child until it exits, forwarding everything it does as
/// `ShellEvent::Process` events.
///
/// Event order: `Started` first, then output lines as they arrive, then a
/// single `Exited` once both output streams are drained. If the cancel
/// channel fires, or its sender is dropped, the child is asked to terminate;
/// the resulting `Exited` is still reported so the supervisor can discard it
/// as stale.
pub async fn watch_process(
    mut child: Child,
    generation: Generation,
    events: mpsc::Sender<ShellEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let pid = child.id();
    send(&events, ProcessEvent::Started { generation, pid }).await;

    let mut forwarders = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        forwarders.push(tokio::spawn(forward_lines(stdout, generation, events.clone(), false)));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(tokio::spawn(forward_lines(stderr, generation, events.clone(), true)));
    }

    let status = tokio::select! {
        status = child.wait() => status,

        cancel = &mut cancel_rx => {
            match cancel {
                Ok(()) => info!(generation, ?pid, "termination requested; signalling backend process"),
                Err(_) => debug!(generation, ?pid, "backend owner dropped; signalling backend process"),
            }
            if let Err(e) = request_termination(&mut child) {
                warn!(generation, error = %e, "failed to signal backend process");
            }
            child.wait().await
        }
    };

    let code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(generation, error = %e, "failed to wait for backend process");
            None
        }
    };

    drain_output(forwarders, generation).await;
    send(&events, ProcessEvent::Exited { generation, code }).await;
}

/// Wait for the output forwarders so the last lines (often the reason for a
/// crash) are delivered before `Exited`.
async fn drain_output(forwarders: Vec<JoinHandle<()>>, generation: Generation) {
    let aborts: Vec<_> = forwarders.iter().map(JoinHandle::abort_handle).collect();

    let drained = tokio::time::timeout(OUTPUT_DRAIN_GRACE, async {
        for forwarder in forwarders {
            if let Err(e) = forwarder.await {
                warn!(generation, error = %e, "backend output forwarder failed");
            }
        }
    })
    .await;

    if drained.is_err() {
        debug!(generation, "backend output still open after exit; no longer forwarding it");
        for abort in aborts {
            abort.abort();
        }
    }
}

async fn forward_lines<R>(
    stream: R,
    generation: Generation,
    events: mpsc::Sender<ShellEvent>,
    is_stderr: bool,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let event = if is_stderr {
            ProcessEvent::ErrorLine { generation, line }
        } else {
            ProcessEvent::OutputLine { generation, line }
        };
        send(&events, event).await;
    }
}

async fn send(events: &mpsc::Sender<ShellEvent>, event: ProcessEvent) {
    if events.send(ShellEvent::Process(event)).await.is_err() {
        debug!("shell event channel closed; dropping process event");
    }
}
