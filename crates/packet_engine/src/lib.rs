//! Packet engine: framing, filesystem effects and the host loop.
mod client;
mod dispatch;
mod folder;
mod frame;
mod host;
mod opener;
mod persist;

pub use client::{ClientError, HostClient, RESPONSE_TIMEOUT};
pub use dispatch::{Clock, Dispatcher, PacketCreated, SnapshotWriter};
pub use folder::{AllocError, CreateDir, FolderAllocator, MAX_ALLOCATION_ATTEMPTS};
pub use frame::{FrameCodec, FrameError, MAX_MESSAGE_BYTES};
pub use host::{ExitReason, Host, SessionSummary};
pub use opener::{FolderOpener, OpenError, SystemFolderOpener};
pub use persist::{AtomicFileWriter, PersistError};
