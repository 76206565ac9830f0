//! Remote-control parameter endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::errors::ApiError;

pub const RC_PARAMETERS_URI: &str = "/api/rc_parameters";
pub const RC_PARAMETER_WRITE_URI: &str = "/api/parameter/";

/// Body of a parameter write. Field order is part of the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcParameterWrite {
    pub controllable: String,
    pub param: String,
    pub value: Value,
}

impl RcParameterWrite {
    pub fn new(
        controllable: impl Into<String>,
        param: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            controllable: controllable.into(),
            param: param.into(),
            value: value.into(),
        }
    }
}

/// Parameters the modulator tooling adjusts routinely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownParameter {
    TxGain,
    RxGain,
    DigitalGain,
    PredistorterCoefFile,
}

impl KnownParameter {
    pub const ALL: [KnownParameter; 4] = [
        KnownParameter::TxGain,
        KnownParameter::RxGain,
        KnownParameter::DigitalGain,
        KnownParameter::PredistorterCoefFile,
    ];

    pub fn controllable(&self) -> &'static str {
        match self {
            KnownParameter::TxGain | KnownParameter::RxGain => "uhd",
            KnownParameter::DigitalGain => "gain",
            KnownParameter::PredistorterCoefFile => "memlesspoly",
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            KnownParameter::TxGain => "txgain",
            KnownParameter::RxGain => "rxgain",
            KnownParameter::DigitalGain => "digital",
            KnownParameter::PredistorterCoefFile => "coeffile",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KnownParameter::TxGain => "txgain",
            KnownParameter::RxGain => "rxgain",
            KnownParameter::DigitalGain => "digital-gain",
            KnownParameter::PredistorterCoefFile => "coeffile",
        }
    }
}

impl fmt::Display for KnownParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.controllable(), self.param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter '{0}'")]
pub struct UnknownParameter(pub String);

impl FromStr for KnownParameter {
    type Err = UnknownParameter;

    /// Accepts the short name (`txgain`) or the dotted address (`uhd.txgain`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|known| known.name() == needle || known.to_string() == needle)
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}

/// Fixed-shape wrappers over [`ApiClient`] for the remote-control API.
///
/// Stateless: every call is an independent request.
#[derive(Debug, Clone)]
pub struct RcFacade {
    client: ApiClient,
}

impl RcFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Read all controllables and their parameters.
    pub fn get_parameters<F>(&self, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.client.request_get(RC_PARAMETERS_URI, on_result)
    }

    /// Write one parameter of one controllable.
    pub fn set_parameter<F>(
        &self,
        controllable: impl Into<String>,
        param: impl Into<String>,
        value: impl Into<Value>,
        on_result: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let payload = RcParameterWrite::new(controllable, param, value);
        self.client
            .request_post(RC_PARAMETER_WRITE_URI, &payload, on_result)
    }

    pub fn set_known<F>(
        &self,
        known: KnownParameter,
        value: impl Into<Value>,
        on_result: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.set_parameter(known.controllable(), known.param(), value, on_result)
    }

    pub async fn fetch_parameters(&self) -> Result<Value, ApiError> {
        self.client.fetch_get(RC_PARAMETERS_URI).await
    }

    pub async fn write_parameter(&self, write: &RcParameterWrite) -> Result<Value, ApiError> {
        self.client.fetch_post(RC_PARAMETER_WRITE_URI, write).await
    }
}
