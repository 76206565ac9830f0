//! The `{status, data | reason}` wrapper carried by every API response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status value marking a successful envelope.
pub const STATUS_OK: &str = "ok";

/// Status value the server uses for application-level failures.
pub const STATUS_ERROR: &str = "error";

/// Reason rendered when an error envelope carries no `reason` field.
pub const UNKNOWN_REASON: &str = "unknown error";

/// A decoded response envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    /// `{"status": "ok", "data": ...}`
    Ok(Value),
    /// Any other status; carries the server-supplied reason.
    Error(String),
}

/// Wire form of the envelope, before classification.
///
/// Fields are untyped so that a stray value in a field the status does not
/// use never fails the decode.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawEnvelope {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,
}

impl From<RawEnvelope> for Envelope {
    fn from(raw: RawEnvelope) -> Self {
        match raw.status {
            Some(Value::String(status)) if status == STATUS_OK => {
                Envelope::Ok(raw.data.unwrap_or(Value::Null))
            }
            _ => Envelope::Error(render_reason(raw.reason)),
        }
    }
}

/// Strings render verbatim, other JSON values as their JSON text.
fn render_reason(reason: Option<Value>) -> String {
    match reason {
        None | Some(Value::Null) => UNKNOWN_REASON.to_string(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

impl From<Envelope> for RawEnvelope {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Ok(data) => RawEnvelope {
                status: Some(Value::String(STATUS_OK.to_string())),
                data: Some(data),
                reason: None,
            },
            Envelope::Error(reason) => RawEnvelope {
                status: Some(Value::String(STATUS_ERROR.to_string())),
                data: None,
                reason: Some(Value::String(reason)),
            },
        }
    }
}

impl Envelope {
    /// Decode a response body. Bodies that are not a JSON object are rejected.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("envelope must be a JSON object"));
        }
        let raw: RawEnvelope = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    /// Encode in wire form; mostly useful for fixtures and servers.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(RawEnvelope::from(self.clone())).unwrap_or(Value::Null)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }
}
