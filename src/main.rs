//! rpcx HTTP bridge.
//!
//! Exposes rpcx services over plain HTTP behind bearer token authorization.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ auth ──▶ bridge ──▶ upstream ──────▶ rpcx
//!                     (request id,   (JWT)   (service    (HttpInvoker)     HTTP
//!                      trace,                 path,                        endpoint
//!                      timeout)               headers)
//!     Client Response
//!     ◀────────────── status 200 + payload, or status 200 + X-RPCX-* error headers
//! ```

use std::path::PathBuf;

use clap::Parser;

use rpcx_http_bridge::config::{self, GatewayConfig};
use rpcx_http_bridge::lifecycle;
use rpcx_http_bridge::observability::logging;

#[derive(Parser)]
#[command(name = "rpcx-http-bridge")]
#[command(about = "Expose rpcx services over HTTP", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::finalize(GatewayConfig::default())?,
    };

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "rpcx-http-bridge starting"
    );

    lifecycle::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
