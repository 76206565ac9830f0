//! Error taxonomy for the API client.

use thiserror::Error;

/// Status code reported when no HTTP reply was received at all.
pub const STATUS_NO_RESPONSE: u16 = 0;

/// Status code that marks an unexpected server fault.
pub const STATUS_SERVER_FAULT: u16 = 500;

/// Status text for a reply whose body is not a well-formed envelope.
pub const PARSE_ERROR_TEXT: &str = "parsererror";

/// Status text for a request that failed before any reply arrived.
pub const NETWORK_ERROR_TEXT: &str = "error";

/// Status text for a request that exceeded the configured timeout.
pub const TIMEOUT_TEXT: &str = "timeout";

/// A request that never produced a well-formed envelope.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("transport failure {status} ({status_text})")]
pub struct TransportFailure {
    pub status: u16,
    pub status_text: String,
    /// Raw response body, empty when no reply was received.
    pub body: String,
}

impl TransportFailure {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn network() -> Self {
        Self::new(STATUS_NO_RESPONSE, NETWORK_ERROR_TEXT, "")
    }

    pub fn timeout() -> Self {
        Self::new(STATUS_NO_RESPONSE, TIMEOUT_TEXT, "")
    }

    pub fn parse(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, PARSE_ERROR_TEXT, body)
    }

    pub fn is_server_fault(&self) -> bool {
        self.status == STATUS_SERVER_FAULT
    }
}

/// Outcome of a request that did not succeed.
///
/// By the time a caller sees this value the failure has already been
/// surfaced through the client's notifier or document view.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a well-formed `status: error` envelope.
    #[error("API ERROR: {reason}")]
    Application { reason: String },
    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

impl ApiError {
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Application { reason } => Some(reason),
            ApiError::Transport(_) => None,
        }
    }

    pub fn transport(&self) -> Option<&TransportFailure> {
        match self {
            ApiError::Transport(failure) => Some(failure),
            ApiError::Application { .. } => None,
        }
    }
}

/// Errors while reading [`ApiConfig`](crate::config::ApiConfig) from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{value}': {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} must be a whole number of milliseconds, got '{value}'")]
    Millis { key: &'static str, value: String },
    #[error("unknown server fault policy '{0}' (expected replace-view or notify)")]
    ServerFaultPolicy(String),
}

/// Errors while constructing the HTTP transport.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    #[error("build http client: {0}")]
    Client(#[from] reqwest::Error),
}
