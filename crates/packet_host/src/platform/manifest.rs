//! Native-messaging manifest that registers this executable with the browser.

use std::path::Path;

use anyhow::{ensure, Result};
use serde::Serialize;

pub(crate) const HOST_NAME: &str = "com.joblogger.native_host";

#[derive(Debug, Serialize)]
struct HostManifest<'a> {
    name: &'a str,
    description: &'a str,
    path: String,
    #[serde(rename = "type")]
    transport: &'a str,
    allowed_origins: Vec<String>,
}

pub(crate) fn render(executable: &Path, extension_id: &str) -> Result<String> {
    ensure!(
        !extension_id.is_empty() && extension_id.chars().all(|c| c.is_ascii_alphanumeric()),
        "extension id must be non-empty and alphanumeric, got {extension_id:?}"
    );

    let manifest = HostManifest {
        name: HOST_NAME,
        description: "Saves job postings as local folders with an HTML snapshot",
        path: executable.to_string_lossy().into_owned(),
        transport: "stdio",
        allowed_origins: vec![format!("chrome-extension://{extension_id}/")],
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}
