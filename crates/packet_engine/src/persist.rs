use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use packet_core::{ErrorCode, RequestFailure};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target directory missing or not a directory: {}", .0.display())]
    TargetDir(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<PersistError> for RequestFailure {
    fn from(err: PersistError) -> Self {
        let code = match &err {
            PersistError::Io(io) if io.kind() == ErrorKind::PermissionDenied => {
                ErrorCode::AccessDenied
            }
            _ => ErrorCode::PdfRenderFailed,
        };
        RequestFailure::new(code, format!("Failed to write snapshot: {err}"))
    }
}

/// Atomically writes content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        if !self.dir.is_dir() {
            return Err(PersistError::TargetDir(self.dir.clone()));
        }

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
