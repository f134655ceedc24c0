// src/exec/signal.rs

//! Asking a backend process to shut down.

use std::io;

use tokio::process::Child;

/// Request a graceful shutdown of `child`.
///
/// On unix the child leads its own process group (see
/// `RealProcessBackend::spawn`), so `SIGTERM` goes to the whole group and
/// reaches any workers the backend forked. Elsewhere the child is killed.
#[cfg(unix)]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    // Already reaped: nothing left to signal.
    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = i32::try_from(pid).map_err(io::Error::other)?;
    signal_group_or_pid(pid, libc::SIGTERM)
}

#[cfg(not(unix))]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Signal the process group led by `pid`, falling back to `pid` alone.
/// A process that no longer exists counts as success.
#[cfg(unix)]
fn signal_group_or_pid(pid: i32, signal: i32) -> io::Result<()> {
    if pid <= 0 {
        return Ok(());
    }

    // SAFETY: `libc::kill` takes plain integers and touches no memory of
    // ours; errno is read immediately after each call.
    unsafe {
        if libc::kill(-pid, signal) == 0 {
            return Ok(());
        }
        if libc::kill(pid, signal) == 0 {
            return Ok(());
        }
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        return Ok(());
    }
    Err(err)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn non_positive_pids_are_never_signalled() {
        // kill(0, ..) would hit our own process group.
        assert!(signal_group_or_pid(0, libc::SIGTERM).is_ok());
        assert!(signal_group_or_pid(-1, libc::SIGTERM).is_ok());
    }

    #[test]
    fn missing_process_is_not_an_error() {
        assert!(signal_group_or_pid(i32::MAX, 0).is_ok());
    }
}
