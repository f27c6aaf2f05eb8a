//! Caller-side helpers: what the browser extension feeds into a request.
//!
//! The page scraper and the settings store live outside this workspace;
//! these types describe the seams they plug into.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{default_folder_name, CreateJobPacketPayload, Envelope, OpenFolderPayload, Request};

/// Settings key holding the folder new job packets are created under.
pub const BASE_FOLDER_KEY: &str = "baseFolder";

/// Fields extracted from a job-detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub pay: Option<String>,
    pub posted_age: Option<String>,
    pub applicants: Option<String>,
    pub description_html: String,
    pub source_url: String,
    pub captured_at_iso: String,
}

/// Snapshot file name the browser extension asks for.
pub const EXTENSION_SNAPSHOT_NAME: &str = "ad.pdf";

/// Naming hints sent along with a packet request. Left empty, the host
/// picks the folder and snapshot names itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketOptions {
    pub folder_name: Option<String>,
    pub pdf_file_name: Option<String>,
}

impl PacketOptions {
    /// The names the browser extension sends: a dated folder name built
    /// from the page and a legacy `ad.pdf` snapshot name.
    pub fn dated(date: NaiveDate, fields: &JobFields) -> Self {
        Self {
            folder_name: Some(default_folder_name(date, &fields.company, &fields.title)),
            pdf_file_name: Some(EXTENSION_SNAPSHOT_NAME.to_string()),
        }
    }
}

/// Key-value settings persisted by the caller.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallerError {
    #[error("base folder is not configured; set it in the settings first")]
    BaseFolderNotConfigured,
}

/// Random UUID v4 request id.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn ping_request() -> Envelope {
    Envelope::new(new_request_id(), Request::Ping)
}

pub fn open_folder_request(path: impl Into<String>) -> Envelope {
    Envelope::new(
        new_request_id(),
        Request::OpenFolder(OpenFolderPayload {
            path: Some(path.into()),
        }),
    )
}

/// Builds a `CreateJobPacket` request from scraped fields and the configured
/// base folder.
///
/// # Errors
///
/// Returns [`CallerError::BaseFolderNotConfigured`] before anything is sent
/// when the settings carry no usable base folder.
pub fn create_job_packet_request(
    fields: &JobFields,
    settings: &dyn SettingsStore,
) -> Result<Envelope, CallerError> {
    create_job_packet_request_with(fields, settings, PacketOptions::default())
}

/// [`create_job_packet_request`] with explicit naming hints.
pub fn create_job_packet_request_with(
    fields: &JobFields,
    settings: &dyn SettingsStore,
    options: PacketOptions,
) -> Result<Envelope, CallerError> {
    let base_folder = settings
        .get(BASE_FOLDER_KEY)
        .filter(|value| !value.trim().is_empty())
        .ok_or(CallerError::BaseFolderNotConfigured)?;

    let payload = CreateJobPacketPayload {
        source_url: Some(fields.source_url.clone()),
        captured_at_iso: Some(fields.captured_at_iso.clone()),
        title: Some(fields.title.clone()),
        company: Some(fields.company.clone()),
        location: fields.location.clone(),
        pay: fields.pay.clone(),
        posted_age: fields.posted_age.clone(),
        applicants: fields.applicants.clone(),
        description_html: Some(fields.description_html.clone()),
        base_folder: Some(base_folder),
        folder_name: options.folder_name,
        pdf_file_name: options.pdf_file_name,
    };

    Ok(Envelope::new(
        new_request_id(),
        Request::CreateJobPacket(payload),
    ))
}
