//! Request dispatch: one decoded message in, one response out.
//!
//! Nothing that goes wrong while handling a request escapes this module.
//! Decode failures, validation failures and filesystem failures become
//! `ok: false` responses, and a panicking handler becomes `INTERNAL_ERROR`.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use packet_core::{
    default_folder_name, render_snapshot, snapshot_file_name, CreateJobPacketPayload, Envelope,
    ErrorCode, OpenFolderPayload, Request, RequestFailure, Response,
};
use packet_logging::{append_error_log, packet_debug, packet_error, packet_info, packet_warn};

use crate::folder::FolderAllocator;
use crate::opener::FolderOpener;
use crate::persist::{AtomicFileWriter, PersistError};

/// Source of local wall-clock time for folder names and snapshot footers.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Writes `{dir}/{file_name}` and returns the written path.
pub type SnapshotWriter =
    Arc<dyn Fn(&Path, &str, &str) -> Result<PathBuf, PersistError> + Send + Sync>;

/// Result of a successful `CreateJobPacket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketCreated {
    pub folder: PathBuf,
    pub snapshot: PathBuf,
    pub warnings: Vec<String>,
}

pub struct Dispatcher {
    opener: Arc<dyn FolderOpener>,
    clock: Clock,
    writer: SnapshotWriter,
    error_log: PathBuf,
}

impl Dispatcher {
    pub fn new(opener: Arc<dyn FolderOpener>) -> Self {
        Self {
            opener,
            clock: Arc::new(|| chrono::Local::now().naive_local()),
            writer: Arc::new(|dir: &Path, file_name: &str, content: &str| {
                AtomicFileWriter::new(dir).write(file_name, content)
            }),
            error_log: packet_logging::default_error_log_path(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_snapshot_writer(mut self, writer: SnapshotWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_error_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log = path.into();
        self
    }

    pub fn error_log(&self) -> &Path {
        &self.error_log
    }

    /// Decodes `text` and handles it. Always produces a response.
    pub fn handle_message(&self, text: &str) -> Response {
        let envelope = match Envelope::parse(text) {
            Ok(envelope) => envelope,
            Err(err) => {
                packet_warn!("Rejected message (request_id={:?}): {}", err.request_id, err);
                return Response::failure(err.request_id, err.failure);
            }
        };

        let request_id = envelope.request_id.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(envelope))) {
            Ok(response) => response,
            Err(panic) => {
                let detail = panic_detail(panic.as_ref());
                packet_error!("Handler panicked for request {}: {}", request_id, detail);
                append_error_log(
                    &self.error_log,
                    &format!("handler panicked for request {request_id}: {detail}"),
                );
                Response::failure(
                    request_id,
                    RequestFailure::new(ErrorCode::InternalError, "Internal server error"),
                )
            }
        }
    }

    /// Routes an already decoded envelope to its handler.
    pub fn dispatch(&self, envelope: Envelope) -> Response {
        let Envelope {
            request_id,
            request,
            ..
        } = envelope;
        packet_debug!("Dispatching {:?} request {}", request.kind(), request_id);

        let outcome = match request {
            Request::Ping => return Response::pong(request_id),
            Request::CreateJobPacket(payload) => {
                self.create_job_packet(payload).map(|created| {
                    Response::packet_created(
                        request_id.clone(),
                        created.folder.to_string_lossy(),
                        created.snapshot.to_string_lossy(),
                        created.warnings,
                    )
                })
            }
            Request::OpenFolder(payload) => self
                .open_folder(payload)
                .map(|()| Response::acknowledged(request_id.clone())),
        };

        outcome.unwrap_or_else(|failure| {
            packet_warn!("Request {} failed: {}", request_id, failure);
            if matches!(
                failure.code,
                ErrorCode::PdfRenderFailed | ErrorCode::OpenFolderFailed
            ) {
                append_error_log(
                    &self.error_log,
                    &format!("request {request_id} failed: {failure}"),
                );
            }
            Response::failure(request_id, failure)
        })
    }

    /// Validates the payload, allocates the job folder and writes the snapshot.
    ///
    /// The snapshot is always HTML. A folder left empty by a failed write is
    /// removed again.
    pub fn create_job_packet(
        &self,
        payload: CreateJobPacketPayload,
    ) -> Result<PacketCreated, RequestFailure> {
        let packet = payload.validate()?;
        let now = (self.clock)();

        let desired = packet
            .folder_name
            .clone()
            .unwrap_or_else(|| default_folder_name(now.date(), &packet.company, &packet.title));
        let folder = FolderAllocator::new(&packet.base_folder).allocate(&desired)?;

        let name = snapshot_file_name(packet.pdf_file_name.as_deref());
        let html = render_snapshot(&packet, &now.format("%Y-%m-%d %H:%M:%S").to_string());
        let snapshot = match (self.writer)(folder.as_path(), &name.file_name, &html) {
            Ok(path) => path,
            Err(err) => {
                let _ = fs::remove_dir(&folder);
                return Err(err.into());
            }
        };

        packet_info!("Created job packet {:?}", snapshot);
        Ok(PacketCreated {
            folder,
            snapshot,
            warnings: name.warning.into_iter().collect(),
        })
    }

    /// Opens an existing folder. A missing or non-directory path is a no-op.
    pub fn open_folder(&self, payload: OpenFolderPayload) -> Result<(), RequestFailure> {
        let Some(path) = payload
            .path
            .map(|p| PathBuf::from(p.trim()))
            .filter(|p| !p.as_os_str().is_empty())
        else {
            packet_info!("OpenFolder without a path; nothing to open");
            return Ok(());
        };
        if !path.is_dir() {
            packet_info!("OpenFolder target {:?} is not a directory; nothing to open", path);
            return Ok(());
        }

        self.opener
            .open(&path)
            .map_err(|err| RequestFailure::new(ErrorCode::OpenFolderFailed, err.to_string()))
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
