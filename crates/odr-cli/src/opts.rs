//! Global CLI options.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use odr_api::{ApiConfig, ServerFaultPolicy, parse_base_url};

/// Connection options shared by every command.
///
/// Unset flags fall back to the `ODR_*` environment (and `.env`).
#[derive(Args, Debug, Clone)]
pub struct ApiOpts {
    /// API base url (env: ODR_API_URL)
    #[arg(long, global = true, env = "ODR_API_URL")]
    pub url: Option<String>,

    /// Request timeout in milliseconds (env: ODR_API_TIMEOUT_MS)
    #[arg(long, global = true, env = "ODR_API_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Report server faults as notices instead of dumping the raw body
    #[arg(long, global = true)]
    pub notify_server_faults: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log request activity to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ApiOpts {
    pub fn api_config(&self) -> Result<ApiConfig> {
        let mut cfg = ApiConfig::from_env().context("read ODR_* environment")?;
        if let Some(url) = &self.url {
            cfg.base_url = parse_base_url(url)?;
        }
        if let Some(ms) = self.timeout_ms {
            cfg.timeout = Duration::from_millis(ms);
        }
        if self.notify_server_faults {
            cfg.server_fault = ServerFaultPolicy::Notify;
        }
        Ok(cfg)
    }
}
