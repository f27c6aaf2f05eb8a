use serde::{Deserialize, Serialize};

use crate::{ErrorCode, RequestFailure, PROTOCOL_VERSION};

/// Greeting returned by `Ping`.
pub const PING_MESSAGE: &str = "Native host is responding";

/// A response to exactly one request. `ok` discriminates success and failure.
///
/// Decoding rejects an `ok` flag that disagrees with the fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireResponse")]
pub struct Response {
    pub request_id: String,
    ok: bool,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    request_id: String,
    ok: bool,
    #[serde(flatten)]
    body: ResponseBody,
}

impl TryFrom<WireResponse> for Response {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        let response = Response::new(wire.request_id, wire.body);
        if response.ok != wire.ok {
            return Err(format!(
                "response {:?} has ok={} but fields of a {} response",
                response.request_id,
                wire.ok,
                if response.ok { "successful" } else { "failed" },
            ));
        }
        Ok(response)
    }
}

/// Kind-specific response fields.
///
/// Variant order matters for decoding: the shape with the fewest required
/// fields comes last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ResponseBody {
    PacketCreated {
        folder_path: String,
        pdf_path: String,
        #[serde(default)]
        warnings: Vec<String>,
    },
    Failed {
        error_code: ErrorCode,
        message: String,
    },
    Pong {
        message: String,
        version: String,
    },
    Acknowledged {},
}

impl Response {
    fn new(request_id: impl Into<String>, body: ResponseBody) -> Self {
        let ok = !matches!(body, ResponseBody::Failed { .. });
        Self {
            request_id: request_id.into(),
            ok,
            body,
        }
    }

    pub fn pong(request_id: impl Into<String>) -> Self {
        Self::new(
            request_id,
            ResponseBody::Pong {
                message: PING_MESSAGE.to_string(),
                version: PROTOCOL_VERSION.to_string(),
            },
        )
    }

    pub fn packet_created(
        request_id: impl Into<String>,
        folder_path: impl Into<String>,
        pdf_path: impl Into<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self::new(
            request_id,
            ResponseBody::PacketCreated {
                folder_path: folder_path.into(),
                pdf_path: pdf_path.into(),
                warnings,
            },
        )
    }

    pub fn acknowledged(request_id: impl Into<String>) -> Self {
        Self::new(request_id, ResponseBody::Acknowledged {})
    }

    pub fn failure(request_id: impl Into<String>, failure: RequestFailure) -> Self {
        Self::new(
            request_id,
            ResponseBody::Failed {
                error_code: failure.code,
                message: failure.message,
            },
        )
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match &self.body {
            ResponseBody::Failed { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_wire_shape() {
        let json = serde_json::to_string(&Response::pong("abc")).unwrap();
        assert_eq!(
            json,
            r#"{"requestId":"abc","ok":true,"message":"Native host is responding","version":"1.0"}"#
        );
    }

    #[test]
    fn acknowledged_carries_only_id_and_ok() {
        let json = serde_json::to_string(&Response::acknowledged("x")).unwrap();
        assert_eq!(json, r#"{"requestId":"x","ok":true}"#);
    }

    #[test]
    fn failure_decodes_back_to_failed_variant() {
        let response = Response::failure(
            "r1",
            RequestFailure::new(ErrorCode::MissingTitle, "Job title is required"),
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""ok":false"#));
        assert!(json.contains(r#""errorCode":"MISSING_TITLE""#));

        let decoded: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, response);
        assert_eq!(decoded.error_code(), Some(ErrorCode::MissingTitle));
    }

    #[test]
    fn failure_with_unknown_code_is_rejected() {
        let json = r#"{"requestId":"r2","ok":false,"errorCode":"DISK_ON_FIRE","message":"x"}"#;
        let err = serde_json::from_str::<Response>(json).unwrap_err();
        assert!(err.to_string().contains("ok=false"));
    }

    #[test]
    fn acknowledgement_still_decodes() {
        let decoded: Response = serde_json::from_str(r#"{"requestId":"a","ok":true}"#).unwrap();
        assert_eq!(decoded, Response::acknowledged("a"));
    }
}
