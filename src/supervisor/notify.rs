// src/supervisor/notify.rs

//! User-facing notifications raised by the supervisor.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::{error, warn};

/// Conditions serious enough to interrupt the user.
///
/// Only two exist: the executable could not be found, or the OS refused to
/// start it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalNotice {
    ExecutableNotFound { candidates: Vec<PathBuf> },
    SpawnFailed { program: PathBuf, detail: String },
}

impl FatalNotice {
    pub fn title(&self) -> &'static str {
        match self {
            FatalNotice::ExecutableNotFound { .. } => "Backend not found",
            FatalNotice::SpawnFailed { .. } => "Backend failed to start",
        }
    }
}

impl fmt::Display for FatalNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalNotice::ExecutableNotFound { candidates } => {
                writeln!(f, "The backend executable was not found. Checked:")?;
                for path in candidates {
                    writeln!(f, "  - {}", path.display())?;
                }
                Ok(())
            }
            FatalNotice::SpawnFailed { program, detail } => {
                writeln!(f, "Could not start {}:", program.display())?;
                writeln!(f, "  {detail}")
            }
        }
    }
}

/// The backend ended on its own after starting successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitNotice {
    pub pid: Option<u32>,
    pub code: Option<i32>,
}

/// Where the supervisor surfaces problems to the user.
pub trait Notifier: Send {
    /// Blocking, modal surface. Called at most once per start attempt.
    fn fatal(&self, notice: &FatalNotice);

    /// Non-blocking indicator for an unexpected backend exit.
    fn backend_exited(&self, _notice: &ExitNotice) {}
}

/// Notifier for a shell without a window toolkit attached: writes the
/// notice to stderr.
#[derive(Debug, Clone, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn fatal(&self, notice: &FatalNotice) {
        error!(title = notice.title(), "{notice}");
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "== {} ==", notice.title());
        let _ = write!(stderr, "{notice}");
    }

    fn backend_exited(&self, notice: &ExitNotice) {
        warn!(pid = ?notice.pid, code = ?notice.code, "backend is no longer running");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_notice_lists_every_candidate() {
        let notice = FatalNotice::ExecutableNotFound {
            candidates: vec![PathBuf::from("/res/api.exe"), PathBuf::from("/res/resources/api.exe")],
        };
        let text = notice.to_string();
        assert!(text.contains("  - /res/api.exe\n"));
        assert!(text.contains("  - /res/resources/api.exe\n"));
        assert_eq!(notice.title(), "Backend not found");
    }

    #[test]
    fn spawn_notice_includes_the_os_detail() {
        let notice = FatalNotice::SpawnFailed {
            program: PathBuf::from("/app/api"),
            detail: "Permission denied (os error 13)".to_string(),
        };
        assert!(notice.to_string().contains("Permission denied (os error 13)"));
    }
}
