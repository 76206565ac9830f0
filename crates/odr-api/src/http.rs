//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ApiConfig;
use crate::envelope::Envelope;
use crate::errors::{
    NETWORK_ERROR_TEXT, STATUS_NO_RESPONSE, TransportBuildError, TransportFailure,
};
use crate::ports::{ApiRequest, JSON_CONTENT_TYPE, Method, Transport};

/// Executes requests against the API host named by [`ApiConfig::base_url`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: ApiConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url.as_str())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportBuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: ApiRequest) -> Result<Envelope, TransportFailure> {
        let url = self.config.resolve(&request.uri).map_err(|err| {
            TransportFailure::new(
                STATUS_NO_RESPONSE,
                NETWORK_ERROR_TEXT,
                format!("invalid request uri '{}': {err}", request.uri),
            )
        })?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        builder = builder.header(CONTENT_TYPE, request.content_type());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            debug!(%url, error = %err, "request did not complete");
            if err.is_timeout() {
                TransportFailure::timeout()
            } else {
                TransportFailure::network()
            }
        })?;

        let status = response.status();
        let status_text = status_text(&response);
        let bytes = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                TransportFailure::timeout()
            } else {
                TransportFailure::network()
            }
        })?;

        if !status.is_success() {
            return Err(TransportFailure::new(
                status.as_u16(),
                status_text,
                String::from_utf8_lossy(&bytes),
            ));
        }

        Envelope::decode(&bytes)
            .map_err(|_| TransportFailure::parse(status.as_u16(), String::from_utf8_lossy(&bytes)))
    }
}

/// The reason phrase the server sent, or the canonical one for the code.
///
/// hyper only records the phrase when it differs from the canonical text.
fn status_text(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}
