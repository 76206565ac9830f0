//! Envelope-aware request client.
//!
//! Every request ends in exactly one observable effect:
//!
//! - `status: ok` envelope: the caller's continuation runs with `data`.
//! - `status: error` envelope: a sticky `"API ERROR: <reason>"` notification.
//! - transport failure with status 500: the raw body replaces the document
//!   (unless [`ServerFaultPolicy::Notify`] is configured).
//! - any other transport failure: a sticky `"AJAX failed: <status text>"`
//!   notification.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{ApiConfig, ServerFaultPolicy};
use crate::envelope::Envelope;
use crate::errors::{
    ApiError, NETWORK_ERROR_TEXT, STATUS_NO_RESPONSE, TransportBuildError, TransportFailure,
};
use crate::http::HttpTransport;
use crate::ports::{ApiRequest, DocumentView, Notification, Notifier, Transport};

/// Title of every notification raised by the client.
pub const NOTIFICATION_TITLE: &str = "API";

pub const TRANSPORT_FAILURE_PREFIX: &str = "AJAX failed: ";
pub const APPLICATION_ERROR_PREFIX: &str = "API ERROR: ";

/// Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    view: Arc<dyn DocumentView>,
    warning_icon: Arc<str>,
    server_fault: ServerFaultPolicy,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("warning_icon", &self.warning_icon)
            .field("server_fault", &self.server_fault)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        view: Arc<dyn DocumentView>,
    ) -> Self {
        Self {
            transport,
            notifier,
            view,
            warning_icon: Arc::from(config.warning_icon.as_str()),
            server_fault: config.server_fault,
        }
    }

    /// Client backed by [`HttpTransport`].
    pub fn connect(
        config: &ApiConfig,
        notifier: Arc<dyn Notifier>,
        view: Arc<dyn DocumentView>,
    ) -> Result<Self, TransportBuildError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(config, Arc::new(transport), notifier, view))
    }

    /// Issue a GET and hand `data` to `on_result` on success.
    ///
    /// Returns immediately; the exchange runs on the current tokio runtime.
    /// `on_result` runs at most once and never on a failure path.
    pub fn request_get<F>(&self, uri: impl Into<String>, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.dispatch(Ok(ApiRequest::get(uri)), on_result)
    }

    /// Issue a POST with `payload` as a JSON body; otherwise as [`request_get`](Self::request_get).
    pub fn request_post<P, F>(
        &self,
        uri: impl Into<String>,
        payload: &P,
        on_result: F,
    ) -> JoinHandle<()>
    where
        P: Serialize + ?Sized,
        F: FnOnce(Value) + Send + 'static,
    {
        self.dispatch(post_request(uri.into(), payload), on_result)
    }

    /// Awaitable form of [`request_get`](Self::request_get).
    ///
    /// Failures are routed to the notifier or document view before the
    /// error is returned; the returned error is informational only.
    pub async fn fetch_get(&self, uri: impl Into<String>) -> Result<Value, ApiError> {
        self.execute(ApiRequest::get(uri)).await
    }

    /// Awaitable form of [`request_post`](Self::request_post).
    pub async fn fetch_post<P>(&self, uri: impl Into<String>, payload: &P) -> Result<Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        match post_request(uri.into(), payload) {
            Ok(request) => self.execute(request).await,
            Err(failure) => Err(self.route_transport_failure(failure)),
        }
    }

    /// Run one exchange and route its outcome.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        debug!(method = %request.method, uri = %request.uri, "api request");
        let method = request.method;
        let uri = request.uri.clone();
        match self.transport.exchange(request).await {
            Ok(Envelope::Ok(data)) => {
                debug!(%method, %uri, "api request succeeded");
                Ok(data)
            }
            Ok(Envelope::Error(reason)) => {
                warn!(%method, %uri, %reason, "api reported an error");
                self.alert(format!("{APPLICATION_ERROR_PREFIX}{reason}"));
                Err(ApiError::Application { reason })
            }
            Err(failure) => {
                warn!(
                    %method,
                    %uri,
                    status = failure.status,
                    status_text = %failure.status_text,
                    "api transport failure"
                );
                Err(self.route_transport_failure(failure))
            }
        }
    }

    fn dispatch<F>(
        &self,
        request: Result<ApiRequest, TransportFailure>,
        on_result: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let outcome = match request {
                Ok(request) => client.execute(request).await,
                Err(failure) => Err(client.route_transport_failure(failure)),
            };
            if let Ok(data) = outcome {
                on_result(data);
            }
        })
    }

    fn route_transport_failure(&self, failure: TransportFailure) -> ApiError {
        if failure.is_server_fault() && self.server_fault == ServerFaultPolicy::ReplaceView {
            self.view.replace_document(&failure.body);
        } else {
            self.alert(format!("{TRANSPORT_FAILURE_PREFIX}{}", failure.status_text));
        }
        ApiError::Transport(failure)
    }

    fn alert(&self, text: String) {
        self.notifier.notify(Notification {
            title: NOTIFICATION_TITLE.to_string(),
            text,
            icon: self.warning_icon.to_string(),
            sticky: true,
        });
    }
}

/// Unserializable payloads never reach the wire; they surface as a
/// transport failure that received no reply.
fn post_request<P>(uri: String, payload: &P) -> Result<ApiRequest, TransportFailure>
where
    P: Serialize + ?Sized,
{
    match serde_json::to_value(payload) {
        Ok(body) => Ok(ApiRequest::post(uri, body)),
        Err(err) => {
            warn!(%uri, error = %err, "payload is not serializable");
            Err(TransportFailure::new(
                STATUS_NO_RESPONSE,
                NETWORK_ERROR_TEXT,
                err.to_string(),
            ))
        }
    }
}
