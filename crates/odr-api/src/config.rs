//! Client configuration and its `ODR_*` environment overrides.

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8099/";
pub const DEFAULT_WARNING_ICON: &str = "/fonts/warning.png";

/// How a status-500 transport failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerFaultPolicy {
    /// Replace the current document with the raw diagnostic body.
    #[default]
    ReplaceView,
    /// Report through the notifier like any other transport failure.
    Notify,
}

impl FromStr for ServerFaultPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace-view" | "replace_view" | "view" => Ok(Self::ReplaceView),
            "notify" => Ok(Self::Notify),
            other => Err(ConfigError::ServerFaultPolicy(other.to_string())),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Request URIs are resolved against this with [`Url::join`].
    pub base_url: Url,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Icon reference attached to every failure notification.
    pub warning_icon: String,
    pub server_fault: ServerFaultPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            warning_icon: DEFAULT_WARNING_ICON.to_string(),
            server_fault: ServerFaultPolicy::default(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Build from `ODR_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(url) = lookup("ODR_API_URL") {
            cfg.base_url = parse_base_url(&url)?;
        }
        if let Some(ms) = lookup("ODR_API_TIMEOUT_MS") {
            cfg.timeout = parse_millis("ODR_API_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("ODR_API_CONNECT_TIMEOUT_MS") {
            cfg.connect_timeout = parse_millis("ODR_API_CONNECT_TIMEOUT_MS", &ms)?;
        }
        if let Some(icon) = lookup("ODR_WARNING_ICON") {
            cfg.warning_icon = icon;
        }
        if let Some(policy) = lookup("ODR_SERVER_FAULT") {
            cfg.server_fault = policy.parse()?;
        }
        Ok(cfg)
    }

    /// Resolve a request path or URL against the base url.
    pub fn resolve(&self, uri: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(uri)
    }
}

/// Parse a base url, appending the trailing slash `Url::join` relies on.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::BaseUrl {
        value: value.to_string(),
        source,
    })
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Millis {
            key,
            value: value.to_string(),
        })
}
