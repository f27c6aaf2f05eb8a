//! Packet core: wire model, validation and rendering without any IO.
mod caller;
mod envelope;
mod error_code;
mod folder_name;
mod payload;
mod response;
mod session;
mod snapshot;

pub use caller::{
    create_job_packet_request, create_job_packet_request_with, new_request_id,
    open_folder_request, ping_request, CallerError, JobFields, MemorySettings, PacketOptions,
    SettingsStore, BASE_FOLDER_KEY, EXTENSION_SNAPSHOT_NAME,
};
pub use envelope::{Envelope, EnvelopeError, Request, RequestKind, PROTOCOL_VERSION};
pub use error_code::{ErrorCode, RequestFailure};
pub use folder_name::{
    default_folder_name, sanitize_folder_name, FALLBACK_FOLDER_NAME, MAX_FOLDER_NAME_CHARS,
};
pub use payload::{CreateJobPacketPayload, JobPacket, OpenFolderPayload};
pub use response::{Response, ResponseBody, PING_MESSAGE};
pub use session::{advance, HostState, LoopEvent};
pub use snapshot::{
    escape_html, render_snapshot, snapshot_file_name, SnapshotName, DEFAULT_SNAPSHOT_FILENAME,
};
