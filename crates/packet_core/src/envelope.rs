//! Request envelope decoding.
//!
//! The common fields (`version`, `kind`, `requestId`) are decoded first and
//! the payload is held as raw JSON until `kind` has been resolved, at which
//! point it is decoded straight into the matching variant payload.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{CreateJobPacketPayload, ErrorCode, OpenFolderPayload, RequestFailure};

/// Protocol version spoken by this host and reported by `Ping`.
pub const PROTOCOL_VERSION: &str = "1.0";

/// The closed set of request kinds. Matched case-insensitively on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Ping,
    CreateJobPacket,
    OpenFolder,
}

impl RequestKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "ping" => Some(RequestKind::Ping),
            "createjobpacket" => Some(RequestKind::CreateJobPacket),
            "openfolder" => Some(RequestKind::OpenFolder),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Ping => "Ping",
            RequestKind::CreateJobPacket => "CreateJobPacket",
            RequestKind::OpenFolder => "OpenFolder",
        }
    }
}

/// A request with its payload already decoded for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Ping,
    CreateJobPacket(CreateJobPacketPayload),
    OpenFolder(OpenFolderPayload),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Ping => RequestKind::Ping,
            Request::CreateJobPacket(_) => RequestKind::CreateJobPacket,
            Request::OpenFolder(_) => RequestKind::OpenFolder,
        }
    }
}

/// One decoded request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: String,
    pub request_id: String,
    pub request: Request,
}

/// Why a message could not be turned into an [`Envelope`].
///
/// `request_id` is empty when the id could not be recovered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{failure}")]
pub struct EnvelopeError {
    pub request_id: String,
    pub failure: RequestFailure,
}

impl EnvelopeError {
    fn new(request_id: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            failure: RequestFailure::new(code, message),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    payload: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn new(request_id: impl Into<String>, request: Request) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: request_id.into(),
            request,
        }
    }

    /// Decodes a message body.
    ///
    /// # Errors
    ///
    /// - `JSON_PARSE_ERROR` when the text is not a JSON envelope.
    /// - `INVALID_MESSAGE` when the document is `null`.
    /// - `UNKNOWN_KIND` when `kind` is missing or not recognised.
    /// - `INVALID_PAYLOAD` when the payload does not fit the kind.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let wire: Option<WireEnvelope> = serde_json::from_str(text).map_err(|_| {
            EnvelopeError::new("", ErrorCode::JsonParseError, "Failed to parse JSON message")
        })?;
        let wire = wire.ok_or_else(|| {
            EnvelopeError::new("", ErrorCode::InvalidMessage, "Invalid message format")
        })?;

        let request_id = wire.request_id.unwrap_or_default();
        let raw_kind = wire.kind.unwrap_or_default();
        let kind = RequestKind::parse(&raw_kind).ok_or_else(|| {
            EnvelopeError::new(
                request_id.clone(),
                ErrorCode::UnknownKind,
                format!("Unknown message kind: {raw_kind}"),
            )
        })?;

        let request = match kind {
            RequestKind::Ping => Request::Ping,
            RequestKind::CreateJobPacket => match wire.payload.as_deref() {
                Some(raw) => Request::CreateJobPacket(decode_payload(raw, &request_id)?),
                None => {
                    return Err(EnvelopeError::new(
                        request_id,
                        ErrorCode::InvalidPayload,
                        "Invalid payload",
                    ))
                }
            },
            RequestKind::OpenFolder => match wire.payload.as_deref() {
                Some(raw) => Request::OpenFolder(decode_payload(raw, &request_id)?),
                None => Request::OpenFolder(OpenFolderPayload::default()),
            },
        };

        Ok(Self {
            version: wire.version.unwrap_or_default(),
            request_id,
            request,
        })
    }
}

fn decode_payload<T: for<'de> Deserialize<'de>>(
    raw: &RawValue,
    request_id: &str,
) -> Result<T, EnvelopeError> {
    serde_json::from_str(raw.get()).map_err(|err| {
        EnvelopeError::new(
            request_id,
            ErrorCode::InvalidPayload,
            format!("Invalid payload: {err}"),
        )
    })
}

#[derive(Serialize)]
struct EmptyPayload {}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 4)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("kind", self.request.kind().as_str())?;
        state.serialize_field("requestId", &self.request_id)?;
        match &self.request {
            Request::Ping => state.serialize_field("payload", &EmptyPayload {})?,
            Request::CreateJobPacket(payload) => state.serialize_field("payload", payload)?,
            Request::OpenFolder(payload) => state.serialize_field("payload", payload)?,
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matching_ignores_case() {
        assert_eq!(RequestKind::parse("PING"), Some(RequestKind::Ping));
        assert_eq!(
            RequestKind::parse("createJobPacket"),
            Some(RequestKind::CreateJobPacket)
        );
        assert_eq!(RequestKind::parse("openfolder"), Some(RequestKind::OpenFolder));
        assert_eq!(RequestKind::parse(""), None);
        assert_eq!(RequestKind::parse("ping "), None);
    }

    #[test]
    fn serializes_in_wire_shape() {
        let envelope = Envelope::new("id-1", Request::Ping);
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(
            json,
            r#"{"version":"1.0","kind":"Ping","requestId":"id-1","payload":{}}"#
        );
        assert_eq!(Envelope::parse(&json).unwrap(), envelope);
    }
}
