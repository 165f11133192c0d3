//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): bridged requests by method, outcome
//! - `bridge_request_duration_seconds` (histogram): bridge latency by outcome
//!
//! Outcome is `ok` or `error` as seen by the caller's
//! `X-RPCX-MessageStatusType`, not the HTTP status (always 200).

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Result of a bridged invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Error => "error",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one bridged invocation.
pub fn record_invocation(method: &str, outcome: Outcome, start_time: Instant) {
    let outcome = outcome.as_str();
    metrics::counter!(
        "bridge_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("bridge_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}
