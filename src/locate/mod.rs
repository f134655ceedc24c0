// src/locate/mod.rs

//! Executable locator.
//!
//! The backend executable ends up in different places depending on how the
//! shell was packaged. [`CandidateList`] holds the ordered guesses and
//! [`locate`] picks the first one that actually exists.
//!
//! - [`candidates`] expands layout templates into a [`CandidateList`].

pub mod candidates;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::fs::FileSystem;

pub use candidates::{CandidateList, DEFAULT_LAYOUTS};

/// No candidate path pointed at an existing file.
///
/// Carries every path that was checked so the failure can be reported to
/// whoever packaged the application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend executable not found; checked: {}", DisplayPaths(.candidates))]
pub struct NotFound {
    pub candidates: Vec<PathBuf>,
}

struct DisplayPaths<'a>(&'a [PathBuf]);

impl fmt::Display for DisplayPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Return the first candidate that exists as a regular file.
///
/// Candidates are checked strictly in order and the search stops at the
/// first hit; later candidates are never probed.
pub fn locate(fs: &dyn FileSystem, candidates: &CandidateList) -> Result<PathBuf, NotFound> {
    for candidate in candidates.iter() {
        trace!(path = %candidate.display(), "probing backend candidate");
        if fs.is_file(candidate) {
            debug!(path = %candidate.display(), "backend executable resolved");
            return Ok(candidate.to_path_buf());
        }
    }

    Err(NotFound {
        candidates: candidates.to_vec(),
    })
}

/// Directory the backend must run in: the one containing its executable.
pub fn working_dir_for(executable: &Path) -> PathBuf {
    match executable.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
