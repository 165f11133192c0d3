//! rpcx HTTP endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::bridge::headers::{
    is_rpcx_header, MESSAGE_STATUS_ERROR, X_ERROR_MESSAGE, X_MESSAGE_STATUS_TYPE, X_SERVICE_PATH,
};
use crate::bridge::{InvocationError, InvocationResult, Invoker, Metadata};
use crate::config::UpstreamConfig;

/// Invoker that forwards each call to an rpcx HTTP endpoint.
#[derive(Clone)]
pub struct HttpInvoker {
    client: Client<HttpConnector, Body>,
    endpoint: Uri,
    timeout: Duration,
    max_response_size: usize,
}

impl HttpInvoker {
    /// Create an invoker for `endpoint`.
    pub fn new(endpoint: Uri, timeout: Duration, max_response_size: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            endpoint,
            timeout,
            max_response_size,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, axum::http::uri::InvalidUri> {
        let endpoint = config.address.parse::<Uri>()?;
        Ok(Self::new(
            endpoint,
            Duration::from_secs(config.timeout_secs),
            config.max_response_size,
        ))
    }

    fn build_request(
        &self,
        request: &Request<Bytes>,
        service_path: &str,
    ) -> Result<Request<Body>, InvocationError> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone());

        if let Some(headers) = builder.headers_mut() {
            for (name, value) in request.headers() {
                if is_rpcx_header(name)
                    || name == header::CONTENT_TYPE
                    || name == header::AUTHORIZATION
                {
                    headers.append(name.clone(), value.clone());
                }
            }
            let service_path = HeaderValue::from_str(service_path).map_err(|_| {
                InvocationError::Transport(format!("invalid service path '{service_path}'"))
            })?;
            headers.insert(X_SERVICE_PATH, service_path);
        }

        builder
            .body(Body::from(request.body().clone()))
            .map_err(|e| InvocationError::Transport(e.to_string()))
    }

    async fn forward(
        &self,
        request: &Request<Bytes>,
        service_path: &str,
    ) -> Result<InvocationResult, InvocationError> {
        let upstream_request = self.build_request(request, service_path)?;

        let response = self
            .client
            .request(upstream_request)
            .await
            .map_err(|e| InvocationError::Transport(format!("upstream request failed: {e}")))?;

        let status = response.status();
        let (parts, body) = response.into_parts();
        let payload = axum::body::to_bytes(Body::new(body), self.max_response_size)
            .await
            .map_err(|e| InvocationError::Transport(format!("upstream body: {e}")))?;

        if !status.is_success() {
            return Err(InvocationError::Transport(format!(
                "upstream returned {status}"
            )));
        }

        Ok(translate_response(&parts.headers, payload))
    }
}

/// Map an rpcx HTTP response onto an invocation result.
fn translate_response(headers: &HeaderMap, payload: Bytes) -> InvocationResult {
    let metadata: Metadata = headers
        .iter()
        .filter(|(name, _)| {
            is_rpcx_header(name) && *name != X_MESSAGE_STATUS_TYPE && *name != X_ERROR_MESSAGE
        })
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let failed = headers
        .get(X_MESSAGE_STATUS_TYPE)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(MESSAGE_STATUS_ERROR.as_bytes()));

    let outcome = if failed {
        let message = headers
            .get(X_ERROR_MESSAGE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| String::from_utf8_lossy(&payload).into_owned());
        Err(InvocationError::Remote(message))
    } else {
        Ok(payload)
    };

    InvocationResult { metadata, outcome }
}

#[async_trait]
impl Invoker for HttpInvoker {
    async fn invoke(&self, request: &Request<Bytes>, service_path: &str) -> InvocationResult {
        match tokio::time::timeout(self.timeout, self.forward(request, service_path)).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => InvocationResult::err(error),
            Err(_) => {
                tracing::warn!(
                    service_path = %service_path,
                    timeout = ?self.timeout,
                    "Upstream invocation timed out"
                );
                InvocationResult::err(InvocationError::Timeout)
            }
        }
    }
}
