//! `odr rc` commands.

use anyhow::{Result, anyhow};
use clap::Args;
use odr_api::KnownParameter;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::opts::ApiOpts;

use super::build_facade;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this controllable
    #[arg(long)]
    pub controllable: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Controllable name (e.g., uhd)
    pub controllable: String,

    /// Parameter name (e.g., txgain)
    pub param: String,

    /// New value; parsed as JSON when possible, otherwise sent as a string
    pub value: String,
}

#[derive(Args, Debug)]
pub struct SetKnownArgs {
    /// Parameter name or controllable.param address
    pub parameter: KnownParameter,

    /// New value; parsed as JSON when possible, otherwise sent as a string
    pub value: String,
}

pub async fn cmd_list(opts: &ApiOpts, args: &ListArgs) -> Result<()> {
    let rc = build_facade(opts)?;
    let (tx, rx) = oneshot::channel();
    let handle = rc.get_parameters(move |data| {
        let _ = tx.send(data);
    });
    let data = settle(handle, rx).await?;

    let data = match &args.controllable {
        Some(name) => data
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("controllable '{name}' not present in response"))?,
        None => data,
    };
    print_json(opts, &data)
}

pub async fn cmd_set(opts: &ApiOpts, args: &SetArgs) -> Result<()> {
    let rc = build_facade(opts)?;
    let (tx, rx) = oneshot::channel();
    let handle = rc.set_parameter(
        args.controllable.clone(),
        args.param.clone(),
        parse_value(&args.value),
        move |data| {
            let _ = tx.send(data);
        },
    );
    let data = settle(handle, rx).await?;
    print_json(opts, &data)
}

pub async fn cmd_set_known(opts: &ApiOpts, args: &SetKnownArgs) -> Result<()> {
    let rc = build_facade(opts)?;
    let (tx, rx) = oneshot::channel();
    let handle = rc.set_known(args.parameter, parse_value(&args.value), move |data| {
        let _ = tx.send(data);
    });
    let data = settle(handle, rx).await?;
    print_json(opts, &data)
}

/// Wait for the request task; a dropped sender means a failure was already surfaced.
async fn settle(handle: JoinHandle<()>, rx: oneshot::Receiver<Value>) -> Result<Value> {
    handle.await?;
    rx.await.map_err(|_| anyhow!("request did not succeed"))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json(opts: &ApiOpts, data: &Value) -> Result<()> {
    if opts.pretty {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        println!("{}", serde_json::to_string(data)?);
    }
    Ok(())
}
