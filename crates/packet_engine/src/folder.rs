use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use packet_core::{sanitize_folder_name, ErrorCode, RequestFailure};
use packet_logging::packet_debug;
use thiserror::Error;

/// Upper bound on `" (n)"` candidates tried for one allocation.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 10_000;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error("base folder does not exist: {}", .0.display())]
    BaseNotFound(PathBuf),
    #[error("access denied: {0}")]
    AccessDenied(#[source] io::Error),
    #[error("failed to create folder {}: {source}", .path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free folder name for {} after {} attempts", .0.display(), MAX_ALLOCATION_ATTEMPTS)]
    Exhausted(PathBuf),
}

impl From<AllocError> for RequestFailure {
    fn from(err: AllocError) -> Self {
        let code = match &err {
            AllocError::BaseNotFound(_) => ErrorCode::BasePathNotFound,
            AllocError::AccessDenied(_) => ErrorCode::AccessDenied,
            AllocError::CreateFailed { .. } | AllocError::Exhausted(_) => {
                ErrorCode::FolderCreateFailed
            }
        };
        RequestFailure::new(code, err.to_string())
    }
}

/// Creates one directory; must fail with `AlreadyExists` if it is taken.
pub type CreateDir = fn(&Path) -> io::Result<()>;

/// Creates uniquely named folders directly under an existing base folder.
#[derive(Debug, Clone)]
pub struct FolderAllocator {
    base: PathBuf,
    create_dir: CreateDir,
}

impl FolderAllocator {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            create_dir,
        }
    }

    /// Replaces the directory-creation call, e.g. to simulate a competing writer.
    pub fn with_create_dir(mut self, create_dir: CreateDir) -> Self {
        self.create_dir = create_dir;
        self
    }

    /// Sanitizes `desired` and creates `{base}/{name}`, or `{name} (2)`,
    /// `{name} (3)`, ... if taken. Returns the absolute path created.
    ///
    /// The base folder is never created. Creation itself is the conflict
    /// check: a folder that appears between the existence check and the
    /// create just moves on to the next suffix.
    pub fn allocate(&self, desired: &str) -> Result<PathBuf, AllocError> {
        let base = self.checked_base()?;
        let name = sanitize_folder_name(desired);

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let candidate = if attempt == 1 {
                base.join(&name)
            } else {
                base.join(format!("{name} ({attempt})"))
            };
            if candidate.exists() {
                continue;
            }
            match (self.create_dir)(&candidate) {
                Ok(()) => {
                    packet_debug!("Allocated folder {:?} after {} attempt(s)", candidate, attempt);
                    return Ok(candidate);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                    return Err(AllocError::AccessDenied(err));
                }
                Err(source) => {
                    return Err(AllocError::CreateFailed {
                        path: candidate,
                        source,
                    })
                }
            }
        }

        Err(AllocError::Exhausted(base.join(name)))
    }

    fn checked_base(&self) -> Result<PathBuf, AllocError> {
        match fs::metadata(&self.base) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(AllocError::BaseNotFound(self.base.clone())),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                return Err(AllocError::AccessDenied(err));
            }
            Err(_) => return Err(AllocError::BaseNotFound(self.base.clone())),
        }
        absolute(&self.base)
    }
}

fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}

fn absolute(path: &Path) -> Result<PathBuf, AllocError> {
    std::path::absolute(path).map_err(|source| AllocError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })
}
