//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::net::TcpListener;

use rpcx_http_bridge::auth::Claims;
use rpcx_http_bridge::GatewayConfig;

pub const SECRET: &str = "integration-secret";

/// Config accepting tokens from [`token`].
pub fn config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.auth.secret = SECRET.to_string();
    config
}

/// A token valid for ten minutes.
pub fn token() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let claims = Claims {
        sub: "tester".into(),
        exp: now + 600,
        iat: Some(now),
        iss: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", token())
}

/// Start a mock rpcx HTTP endpoint on an ephemeral port.
///
/// Service `Missing` fails with an rpcx error, `Slow` sleeps for two seconds,
/// anything else answers `<path>.<method>:<body>`.
pub async fn start_mock_rpcx() -> SocketAddr {
    let app = Router::new().route("/", post(mock_rpcx));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn mock_rpcx(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let service_path = get("X-RPCX-ServicePath");
    let method = get("X-RPCX-ServiceMethod");

    let mut response = HeaderMap::new();
    if let Some(id) = headers.get("X-RPCX-MessageID") {
        response.insert("X-RPCX-MessageID", id.clone());
    }
    response.insert("X-RPCX-Meta", HeaderValue::from_static("served=mock"));

    match service_path.as_str() {
        "Missing" => {
            response.insert("X-RPCX-MessageStatusType", HeaderValue::from_static("Error"));
            response.insert(
                "X-RPCX-ErrorMessage",
                HeaderValue::from_static("can't find service Missing"),
            );
            (response, Bytes::new())
        }
        "Slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            (response, Bytes::from_static(b"late"))
        }
        _ => {
            let text = format!(
                "{service_path}.{method}:{}",
                String::from_utf8_lossy(&body)
            );
            (response, Bytes::from(text))
        }
    }
}
