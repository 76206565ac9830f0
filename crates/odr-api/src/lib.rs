//! Client for the modulator's remote-control web API.
//!
//! Every response from the API is wrapped in a `{status, data | reason}`
//! envelope. [`ApiClient`] issues requests through a [`Transport`], unwraps
//! the envelope, and routes each failure to exactly one of the injected
//! collaborators ([`Notifier`] or [`DocumentView`]). [`RcFacade`] fixes the
//! endpoints and payload shapes for reading and writing remote-control
//! parameters.

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod http;
pub mod ports;
pub mod rc;

#[allow(unused_imports)]
pub use client::*;
#[allow(unused_imports)]
pub use config::*;
#[allow(unused_imports)]
pub use envelope::*;
#[allow(unused_imports)]
pub use errors::*;
#[allow(unused_imports)]
pub use http::*;
#[allow(unused_imports)]
pub use ports::*;
#[allow(unused_imports)]
pub use rc::*;
