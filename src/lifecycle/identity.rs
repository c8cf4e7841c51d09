//! Process identity captured at the start of a run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Descriptive state of the current run.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    /// Executable name of this process.
    pub name: String,
    /// Wall-clock start of the run.
    pub started_at: SystemTime,
    /// Absolute working directory at start.
    pub working_dir: PathBuf,
    started: Instant,
}

impl AppIdentity {
    /// Capture identity for a new run.
    ///
    /// Fails only when the working directory cannot be resolved.
    pub fn capture() -> std::io::Result<Self> {
        Self::capture_with(current_working_dir)
    }

    /// Capture identity, resolving the working directory with `working_dir`.
    pub fn capture_with<F>(working_dir: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> std::io::Result<PathBuf>,
    {
        let working_dir = working_dir()?;
        let name = program_name(std::env::args_os().next().as_deref().map(Path::new));
        Ok(Self {
            name,
            started_at: SystemTime::now(),
            working_dir,
            started: Instant::now(),
        })
    }

    /// Time elapsed since the run started.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Base name of the executable, or "quantum" when argv is empty.
fn program_name(argv0: Option<&Path>) -> String {
    argv0
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Absolute working directory of the process.
pub fn current_working_dir() -> std::io::Result<PathBuf> {
    let wd = std::env::current_dir()?;
    if wd.is_absolute() {
        Ok(wd)
    } else {
        std::fs::canonicalize(wd)
    }
}
