// src/locate/candidates.rs

use std::path::{Path, PathBuf};

use crate::errors::{Result, SupervisorError};

/// Placeholder for the application's resources directory.
pub const RESOURCES_PLACEHOLDER: &str = "{resources}";
/// Placeholder for the backend executable's file name.
pub const EXECUTABLE_PLACEHOLDER: &str = "{executable}";

/// Packaging layouts in priority order:
/// 1. directly in the resources root
/// 2. inside the unpacked-archive folder next to the packed app archive
/// 3. inside a nested `resources` folder
pub const DEFAULT_LAYOUTS: [&str; 3] = [
    "{resources}/{executable}",
    "{resources}/app.asar.unpacked/{executable}",
    "{resources}/resources/{executable}",
];

/// Ordered, non-empty list of places the backend executable might live.
/// Every entry is rooted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    paths: Vec<PathBuf>,
}

impl CandidateList {
    pub fn new(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(SupervisorError::ConfigError(
                "candidate path list must not be empty".to_string(),
            ));
        }
        if let Some(relative) = paths.iter().find(|p| !p.has_root()) {
            return Err(SupervisorError::ConfigError(format!(
                "candidate path '{}' must be absolute",
                relative.display()
            )));
        }
        Ok(Self { paths })
    }

    /// Expand layout templates against a resources directory and executable
    /// name, keeping template order.
    pub fn from_layouts<S: AsRef<str>>(
        layouts: &[S],
        resources_dir: &Path,
        executable: &str,
    ) -> Result<Self> {
        let paths = layouts
            .iter()
            .map(|layout| expand_layout(layout.as_ref(), resources_dir, executable))
            .collect::<Result<Vec<_>>>()?;
        Self::new(paths)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// Expand a single layout template into a path.
///
/// Templates rooted at `{resources}` are `/`-separated and their segments
/// are joined with the platform separator, so the same template works on
/// Windows and unix. Any other template is taken as a literal path with
/// only `{executable}` substituted, keeping its own root (`/opt/..`,
/// `C:\..`).
pub fn expand_layout(layout: &str, resources_dir: &Path, executable: &str) -> Result<PathBuf> {
    let mut segments = layout.split('/').filter(|s| !s.is_empty()).peekable();

    if segments.peek() != Some(&RESOURCES_PLACEHOLDER) {
        let expanded = layout.replace(EXECUTABLE_PLACEHOLDER, executable);
        if expanded.contains('{') || expanded.contains('}') {
            return Err(SupervisorError::ConfigError(format!(
                "layout '{layout}' contains an unknown placeholder"
            )));
        }
        return Ok(PathBuf::from(expanded));
    }

    let mut path = PathBuf::new();
    for segment in segments {
        match segment {
            RESOURCES_PLACEHOLDER => path.push(resources_dir),
            _ => {
                let expanded = segment.replace(EXECUTABLE_PLACEHOLDER, executable);
                if expanded.contains('{') || expanded.contains('}') {
                    return Err(SupervisorError::ConfigError(format!(
                        "layout '{layout}' contains an unknown placeholder in segment '{segment}'"
                    )));
                }
                path.push(expanded);
            }
        }
    }

    Ok(path)
}
