//! Request translation between HTTP and rpcx.
//!
//! # Responsibilities
//! - Resolve the service path once per request
//! - Echo `X-RPCX-MessageID` and `Authorization` onto the response
//! - Call the invoker and merge its metadata into the response headers
//! - Encode success as an octet-stream body and failure as error headers plus
//!   an error text body, both with status 200

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::bridge::headers::{
    is_rpcx_header, MESSAGE_STATUS_ERROR, X_ERROR_MESSAGE, X_MESSAGE_ID, X_MESSAGE_STATUS_TYPE,
};
use crate::bridge::invoker::{Invoker, Metadata};
use crate::bridge::service_path::resolve_service_path;
use crate::observability::metrics;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Per-route bridge behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeOptions {
    /// Log the echoed Authorization value in clear text instead of redacting it.
    pub log_authorization: bool,
}

/// Bridge one HTTP request to the invoker and build the HTTP response.
///
/// `suffix` is the part of the URL path matched after the route base. It is
/// only consulted when the request has no `X-RPCX-ServicePath` header.
pub async fn handle(
    mut request: Request<Bytes>,
    suffix: &str,
    invoker: &dyn Invoker,
    options: BridgeOptions,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let service_path = resolve_service_path(request.headers_mut(), suffix);

    let mut response_headers = HeaderMap::new();
    let message_id = non_empty(request.headers(), &X_MESSAGE_ID);
    if let Some(message_id) = &message_id {
        response_headers.insert(X_MESSAGE_ID, message_id.clone());
    }

    if let Some(authorization) = non_empty(request.headers(), &header::AUTHORIZATION) {
        if options.log_authorization {
            tracing::info!(
                authorization = ?authorization,
                service_path = %service_path,
                "Echoing authorization"
            );
        } else {
            tracing::info!(
                authorization = "<redacted>",
                service_path = %service_path,
                "Echoing authorization"
            );
        }
        response_headers.insert(header::AUTHORIZATION, authorization);
    }

    tracing::debug!(
        service_path = %service_path,
        message_id = ?message_id,
        "Invoking rpc service"
    );

    let result = invoker.invoke(&request, &service_path).await;
    merge_metadata(&mut response_headers, &result.metadata);

    match result.outcome {
        Ok(payload) => {
            metrics::record_invocation(&method, metrics::Outcome::Ok, start_time);
            response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
            (StatusCode::OK, response_headers, Body::from(payload)).into_response()
        }
        Err(error) => {
            let message = error.to_string();
            tracing::warn!(
                service_path = %service_path,
                message_id = ?message_id,
                error = %message,
                "Rpc invocation failed"
            );
            metrics::record_invocation(&method, metrics::Outcome::Error, start_time);

            for name in request.headers().keys().filter(|name| is_rpcx_header(name)) {
                if let Some(value) = request.headers().get(name) {
                    response_headers.insert(name.clone(), value.clone());
                }
            }

            response_headers.insert(
                X_MESSAGE_STATUS_TYPE,
                HeaderValue::from_static(MESSAGE_STATUS_ERROR),
            );
            response_headers.insert(X_ERROR_MESSAGE, header_value_lossy(&message));
            response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
            (StatusCode::OK, response_headers, message).into_response()
        }
    }
}

fn non_empty(headers: &HeaderMap, name: &HeaderName) -> Option<HeaderValue> {
    headers
        .get(name)
        .filter(|v| !v.as_bytes().is_empty())
        .cloned()
}

fn merge_metadata(headers: &mut HeaderMap, metadata: &Metadata) {
    for (key, value) in metadata {
        let name = match HeaderName::try_from(key.as_str()) {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!(key = %key, "Skipping metadata with invalid header name");
                continue;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => {
                tracing::warn!(key = %key, "Skipping metadata with invalid header value");
            }
        }
    }
}

/// Header value for arbitrary text; control characters become spaces.
fn header_value_lossy(text: &str) -> HeaderValue {
    HeaderValue::from_str(text).unwrap_or_else(|_| {
        let cleaned: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        HeaderValue::from_str(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(""))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::headers::X_SERVICE_PATH;
    use crate::bridge::invoker::{InvocationError, InvocationResult};
    use std::sync::Mutex;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request() -> axum::http::request::Builder {
        Request::builder().method("POST").uri("/Arith/Mul")
    }

    #[tokio::test]
    async fn test_success_writes_payload_and_metadata() {
        let invoker = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::ok("ok").with_metadata("X", "1")
        };
        let req = request().body(Bytes::new()).unwrap();

        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x").unwrap(), "1");
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), OCTET_STREAM);
        assert!(response.headers().get(X_MESSAGE_STATUS_TYPE).is_none());
        assert!(response.headers().get(X_ERROR_MESSAGE).is_none());
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_failure_is_status_200_with_error_headers() {
        let invoker = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::err(InvocationError::Remote("boom".into()))
        };
        let req = request().body(Bytes::new()).unwrap();

        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(X_MESSAGE_STATUS_TYPE).unwrap(), "Error");
        assert_eq!(response.headers().get(X_ERROR_MESSAGE).unwrap(), "boom");
        assert_eq!(body_text(response).await, "boom");
    }

    #[tokio::test]
    async fn test_rpcx_headers_echoed_only_on_failure() {
        let failing = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::err(InvocationError::Remote("boom".into()))
        };
        let req = request()
            .header("X-RPCX-Trace", "abc")
            .header("X-Other", "nope")
            .body(Bytes::new())
            .unwrap();
        let response = handle(req, "/Arith", &failing, BridgeOptions::default()).await;
        assert_eq!(response.headers().get("X-RPCX-Trace").unwrap(), "abc");
        assert!(response.headers().get("X-Other").is_none());
        // The resolved service path is an rpcx header too.
        assert_eq!(response.headers().get(X_SERVICE_PATH).unwrap(), "Arith");

        let succeeding = |_req: &Request<Bytes>, _path: &str| InvocationResult::ok("ok");
        let req = request()
            .header("X-RPCX-Trace", "abc")
            .body(Bytes::new())
            .unwrap();
        let response = handle(req, "/Arith", &succeeding, BridgeOptions::default()).await;
        assert!(response.headers().get("X-RPCX-Trace").is_none());
    }

    #[tokio::test]
    async fn test_lowercase_rpcx_header_echoed_on_failure() {
        let failing = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::err(InvocationError::Timeout)
        };
        let req = request()
            .header("x-rpcx-trace", "lower")
            .body(Bytes::new())
            .unwrap();
        let response = handle(req, "", &failing, BridgeOptions::default()).await;
        assert_eq!(response.headers().get("X-RPCX-TRACE").unwrap(), "lower");
    }

    #[tokio::test]
    async fn test_message_id_and_authorization_echoed() {
        let invoker = |_req: &Request<Bytes>, _path: &str| InvocationResult::ok("");
        let req = request()
            .header("X-RPCX-MessageID", "42")
            .header("Authorization", "Bearer t0k3n")
            .body(Bytes::new())
            .unwrap();

        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;
        assert_eq!(response.headers().get(X_MESSAGE_ID).unwrap(), "42");
        assert_eq!(response.headers().get(header::AUTHORIZATION).unwrap(), "Bearer t0k3n");
    }

    #[tokio::test]
    async fn test_empty_message_id_not_echoed() {
        let invoker = |_req: &Request<Bytes>, _path: &str| InvocationResult::ok("");
        let req = request()
            .header("X-RPCX-MessageID", "")
            .body(Bytes::new())
            .unwrap();
        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;
        assert!(response.headers().get(X_MESSAGE_ID).is_none());

        let req = request().body(Bytes::new()).unwrap();
        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;
        assert!(response.headers().get(X_MESSAGE_ID).is_none());
    }

    #[tokio::test]
    async fn test_invoker_sees_resolved_path() {
        let seen = Mutex::new(Vec::new());
        let invoker = |req: &Request<Bytes>, path: &str| {
            let header = req
                .headers()
                .get(X_SERVICE_PATH)
                .map(|v| v.to_str().unwrap().to_string());
            seen.lock().unwrap().push((path.to_string(), header));
            InvocationResult::ok("")
        };

        let req = request().body(Bytes::new()).unwrap();
        handle(req, "/foo/bar", &invoker, BridgeOptions::default()).await;

        let req = request()
            .header("X-RPCX-ServicePath", "Explicit")
            .body(Bytes::new())
            .unwrap();
        handle(req, "/foo/bar", &invoker, BridgeOptions::default()).await;

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen[0], ("foo/bar".to_string(), Some("foo/bar".to_string())));
        assert_eq!(seen[1], ("Explicit".to_string(), Some("Explicit".to_string())));
    }

    #[tokio::test]
    async fn test_metadata_applied_on_failure_and_invalid_entries_skipped() {
        let invoker = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::err(InvocationError::Remote("boom".into()))
                .with_metadata("X-Meta", "kept")
                .with_metadata("bad name", "dropped")
                .with_metadata("X-Bad-Value", "line\nbreak")
        };
        let req = request().body(Bytes::new()).unwrap();

        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;
        assert_eq!(response.headers().get("X-Meta").unwrap(), "kept");
        assert!(response.headers().get("X-Bad-Value").is_none());
    }

    #[tokio::test]
    async fn test_multiline_error_sanitized_in_header_only() {
        let invoker = |_req: &Request<Bytes>, _path: &str| {
            InvocationResult::err(InvocationError::Remote("first\nsecond".into()))
        };
        let req = request().body(Bytes::new()).unwrap();

        let response = handle(req, "/Arith", &invoker, BridgeOptions::default()).await;
        assert_eq!(response.headers().get(X_ERROR_MESSAGE).unwrap(), "first second");
        assert_eq!(body_text(response).await, "first\nsecond");
    }
}
