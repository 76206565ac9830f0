pub mod rc;

use std::sync::Arc;

use anyhow::Result;
use odr_api::{ApiClient, RcFacade};

use crate::opts::ApiOpts;
use crate::surface::{StderrNotifier, StdoutView};

/// Client wired to the terminal notifier and document view.
pub fn build_facade(opts: &ApiOpts) -> Result<RcFacade> {
    let config = opts.api_config()?;
    let client = ApiClient::connect(&config, Arc::new(StderrNotifier), Arc::new(StdoutView))?;
    Ok(RcFacade::new(client))
}
