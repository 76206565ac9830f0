//! Collaborator traits the client is wired against.
//!
//! ```text
//!   RcFacade ──▶ ApiClient ──▶ Transport ──▶ network
//!                    │
//!                    ├──▶ Notifier      (transport + application failures)
//!                    └──▶ DocumentView  (server faults)
//! ```

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::errors::TransportFailure;

/// Content type and accept type for every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP exchange as the client describes it to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub uri: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            uri: uri.into(),
            body: None,
        }
    }

    pub fn post(uri: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            uri: uri.into(),
            body: Some(body),
        }
    }

    pub fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }
}

/// Performs one HTTP exchange and resolves to either a decoded envelope or
/// a transport failure. Cancellation and retries are the implementor's
/// business; the client never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: ApiRequest) -> Result<Envelope, TransportFailure>;
}

/// A titled alert shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub text: String,
    pub icon: String,
    /// Sticky alerts persist until dismissed.
    pub sticky: bool,
}

/// Surface for non-blocking failure alerts.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// The page the client is embedded in; only used for the server-fault dump.
pub trait DocumentView: Send + Sync {
    fn replace_document(&self, raw_body: &str);
}
