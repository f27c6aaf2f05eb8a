use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ErrorCode, RequestFailure};

/// `CreateJobPacket` payload as it arrives on the wire.
///
/// Every field is optional here; required fields are enforced by
/// [`CreateJobPacketPayload::validate`] so that a missing title produces
/// `MISSING_TITLE` rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPacketPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at_iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicants: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_file_name: Option<String>,
}

/// `OpenFolder` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFolderPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A packet request whose required fields are known to be present.
///
/// Optional text fields are `None` when absent or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPacket {
    pub source_url: String,
    pub captured_at_iso: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub pay: Option<String>,
    pub posted_age: Option<String>,
    pub applicants: Option<String>,
    pub description_html: String,
    pub base_folder: PathBuf,
    pub folder_name: Option<String>,
    pub pdf_file_name: Option<String>,
}

impl CreateJobPacketPayload {
    /// Checks required fields in order: title, company, base folder.
    pub fn validate(self) -> Result<JobPacket, RequestFailure> {
        let title = required(self.title).ok_or_else(|| {
            RequestFailure::new(ErrorCode::MissingTitle, "Job title is required")
        })?;
        let company = required(self.company).ok_or_else(|| {
            RequestFailure::new(ErrorCode::MissingCompany, "Company name is required")
        })?;
        let base_folder = required(self.base_folder).ok_or_else(|| {
            RequestFailure::new(ErrorCode::BasePathMissing, "Base folder path is required")
        })?;

        Ok(JobPacket {
            source_url: self.source_url.unwrap_or_default(),
            captured_at_iso: self.captured_at_iso.unwrap_or_default(),
            title,
            company,
            location: non_empty(self.location),
            pay: non_empty(self.pay),
            posted_age: non_empty(self.posted_age),
            applicants: non_empty(self.applicants),
            description_html: self.description_html.unwrap_or_default(),
            base_folder: PathBuf::from(base_folder),
            folder_name: required(self.folder_name),
            pdf_file_name: required(self.pdf_file_name),
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateJobPacketPayload {
        CreateJobPacketPayload {
            title: Some("  Engineer ".into()),
            company: Some("Acme".into()),
            base_folder: Some("/tmp/jobs".into()),
            ..Default::default()
        }
    }

    #[test]
    fn validate_trims_required_fields() {
        let packet = payload().validate().unwrap();
        assert_eq!(packet.title, "Engineer");
        assert_eq!(packet.base_folder, PathBuf::from("/tmp/jobs"));
        assert_eq!(packet.folder_name, None);
    }

    #[test]
    fn title_is_checked_before_company() {
        let failure = CreateJobPacketPayload::default().validate().unwrap_err();
        assert_eq!(failure.code, ErrorCode::MissingTitle);
    }

    #[test]
    fn whitespace_base_folder_is_missing() {
        let mut p = payload();
        p.base_folder = Some("   ".into());
        assert_eq!(p.validate().unwrap_err().code, ErrorCode::BasePathMissing);
    }

    #[test]
    fn empty_optionals_collapse_to_none() {
        let mut p = payload();
        p.location = Some(String::new());
        p.pay = Some("$100k".into());
        let packet = p.validate().unwrap();
        assert_eq!(packet.location, None);
        assert_eq!(packet.pay.as_deref(), Some("$100k"));
    }
}
