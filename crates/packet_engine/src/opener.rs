use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to launch {program}: {source}")]
pub struct OpenError {
    pub program: &'static str,
    #[source]
    pub source: io::Error,
}

/// Shows a folder in the desktop's file browser.
pub trait FolderOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<(), OpenError>;
}

/// Launches the platform file browser and returns without waiting for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFolderOpener;

impl SystemFolderOpener {
    fn program() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl FolderOpener for SystemFolderOpener {
    fn open(&self, path: &Path) -> Result<(), OpenError> {
        launch(Self::program(), path).map(drop)
    }
}

/// Starts `program path` and returns its pid. A detached thread reaps the
/// child when it exits.
fn launch(program: &'static str, path: &Path) -> Result<u32, OpenError> {
    // The child must not inherit stdout: it carries the framed protocol.
    let mut child = Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OpenError { program, source })?;
    let pid = child.id();
    thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(pid)
}
