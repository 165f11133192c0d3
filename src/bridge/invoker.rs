//! The RPC invocation seam.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::Request;

/// Response headers produced by an invocation.
pub type Metadata = HashMap<String, String>;

/// Any failure surfaced by an [`Invoker`].
///
/// The bridge does not classify these; only the display text reaches the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    /// The RPC service reported an error.
    #[error("{0}")]
    Remote(String),

    /// The RPC endpoint could not be reached or answered outside the protocol.
    #[error("{0}")]
    Transport(String),

    /// The RPC endpoint did not answer in time.
    #[error("rpc invocation timed out")]
    Timeout,
}

/// Outcome of a single invocation.
///
/// Metadata is returned on both success and failure and is always copied
/// onto the HTTP response.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub metadata: Metadata,
    pub outcome: Result<Bytes, InvocationError>,
}

impl InvocationResult {
    /// Successful invocation carrying `payload`.
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self {
            metadata: Metadata::new(),
            outcome: Ok(payload.into()),
        }
    }

    /// Failed invocation.
    pub fn err(error: InvocationError) -> Self {
        Self {
            metadata: Metadata::new(),
            outcome: Err(error),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Executes the RPC call behind a bridge route.
///
/// `request` already carries the resolved `X-RPCX-ServicePath` header when
/// the path came from the URL.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, request: &Request<Bytes>, service_path: &str) -> InvocationResult;
}

/// Plain functions and closures act as in-process invokers.
#[async_trait]
impl<F> Invoker for F
where
    F: Fn(&Request<Bytes>, &str) -> InvocationResult + Send + Sync,
{
    async fn invoke(&self, request: &Request<Bytes>, service_path: &str) -> InvocationResult {
        self(request, service_path)
    }
}
