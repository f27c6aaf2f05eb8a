use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire-level failure codes carried by `ok: false` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidMessage,
    JsonParseError,
    UnknownKind,
    InvalidPayload,
    MissingTitle,
    MissingCompany,
    BasePathMissing,
    BasePathNotFound,
    AccessDenied,
    FolderCreateFailed,
    PdfRenderFailed,
    OpenFolderFailed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::JsonParseError => "JSON_PARSE_ERROR",
            ErrorCode::UnknownKind => "UNKNOWN_KIND",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::MissingTitle => "MISSING_TITLE",
            ErrorCode::MissingCompany => "MISSING_COMPANY",
            ErrorCode::BasePathMissing => "BASE_PATH_MISSING",
            ErrorCode::BasePathNotFound => "BASE_PATH_NOT_FOUND",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::FolderCreateFailed => "FOLDER_CREATE_FAILED",
            ErrorCode::PdfRenderFailed => "PDF_RENDER_FAILED",
            ErrorCode::OpenFolderFailed => "OPEN_FOLDER_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request: the code sent to the caller plus a readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RequestFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl RequestFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_as_str() {
        for code in [
            ErrorCode::InvalidMessage,
            ErrorCode::JsonParseError,
            ErrorCode::UnknownKind,
            ErrorCode::BasePathNotFound,
            ErrorCode::PdfRenderFailed,
            ErrorCode::InternalError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
