//! # Serve Subcommand
//!
//! `mapval serve --rules <descriptor> [--addr 127.0.0.1:8080]`
//!
//! Serves one rule set over HTTP with the `mapval-api` router.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mapval_api::ApiState;

use crate::check::load_validator;

/// Arguments for the `mapval serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Rule descriptor (.yaml, .yml or .json).
    #[arg(long)]
    pub rules: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,
}

/// Run `mapval serve` until the process is stopped.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let validator = load_validator(&args.rules)?;
    let app = mapval_api::app(ApiState::new(validator));

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(args.addr)
            .await
            .with_context(|| format!("binding {}", args.addr))?;
        tracing::info!(addr = %args.addr, "serving validation api");
        axum::serve(listener, app).await.context("http server")
    })?;
    Ok(0)
}
