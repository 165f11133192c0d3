//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics endpoint when enabled
//! - Build the authorizator and the upstream invoker from config
//! - Register one bridge route per configured base path
//! - Bind the listener and serve until a shutdown signal arrives

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::auth::JwtAuthorizator;
use crate::config::GatewayConfig;
use crate::http::Server;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::upstream::HttpInvoker;

/// Fatal errors while bringing the bridge up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid upstream address: {0}")]
    Upstream(#[from] axum::http::uri::InvalidUri),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] std::net::AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the bridge described by `config` until SIGINT/SIGTERM.
pub async fn start(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let authorizator = Arc::new(JwtAuthorizator::from_config(&config.auth));
    let invoker = Arc::new(HttpInvoker::from_config(&config.upstream)?);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let routes = config.effective_routes();
    let bind_address = config.listener.bind_address.clone();

    let mut server = Server::new(config, authorizator);
    for route in &routes {
        tracing::debug!(name = %route.name, base = %route.base, "Registering route");
        server.register_handler(&route.base, invoker.clone());
    }

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_os_signal();

    server.run(listener, server_shutdown).await?;
    Ok(())
}
