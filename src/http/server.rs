//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router, or extend a caller supplied one
//! - Register bridge routes (POST, GET, PUT) per base path
//! - Guard every bridge route with the authorization middleware
//! - Wire up middleware (tracing, request ID, timeout)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{require_auth, AuthState, Authorizator};
use crate::bridge::{self, BridgeOptions, Invoker};
use crate::config::GatewayConfig;
use crate::lifecycle::ShutdownSignal;

/// State of one registered base path.
#[derive(Clone)]
struct RouteState {
    /// Base path without trailing `/`; empty for the root.
    prefix: Arc<str>,
    invoker: Arc<dyn Invoker>,
    options: BridgeOptions,
    max_body_size: usize,
}

/// HTTP server exposing rpcx services.
pub struct Server {
    router: Router,
    config: GatewayConfig,
    auth: AuthState,
}

impl Server {
    /// Create a server with a fresh router.
    pub fn new(config: GatewayConfig, authorizator: Arc<dyn Authorizator>) -> Self {
        Self::with_router(config, Router::new(), authorizator)
    }

    /// Create a server that adds its routes to `router`.
    ///
    /// Routes already present on `router` are served unchanged and are not
    /// guarded by the bridge's authorization middleware.
    pub fn with_router(
        config: GatewayConfig,
        router: Router,
        authorizator: Arc<dyn Authorizator>,
    ) -> Self {
        let auth = AuthState::new(authorizator, &config.auth.realm);
        Self {
            router,
            config,
            auth,
        }
    }

    /// Expose `invoker` under `base`.
    ///
    /// `POST`, `GET` and `PUT` on `base` and on every path below it reach the
    /// bridge. The path below `base` is the service path unless the request
    /// carries `X-RPCX-ServicePath`.
    ///
    /// # Panics
    /// If `base` overlaps a route already registered on the router.
    pub fn register_handler(&mut self, base: &str, invoker: Arc<dyn Invoker>) {
        let prefix = base.trim_end_matches('/');
        let state = RouteState {
            prefix: Arc::from(prefix),
            invoker,
            options: BridgeOptions {
                log_authorization: self.config.observability.log_authorization,
            },
            max_body_size: self.config.limits.max_body_size,
        };

        let methods = MethodFilter::POST.or(MethodFilter::GET).or(MethodFilter::PUT);
        let mut routes = Router::new();
        for path in route_paths(prefix) {
            routes = routes.route(&path, on(methods, bridge_route).head(head_not_allowed));
        }
        let routes = routes
            .with_state(state)
            .route_layer(middleware::from_fn_with_state(self.auth.clone(), require_auth));

        self.router = std::mem::take(&mut self.router).merge(routes);

        tracing::info!(base = %base, "Registered bridge route");
    }

    /// Finish the router with all middleware layers.
    #[allow(deprecated)]
    pub fn into_router(self) -> Router {
        let timeout = Duration::from_secs(self.config.timeouts.request_secs);
        self.router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(timeout)),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.into_router();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Router paths covering `prefix` itself and everything below it.
fn route_paths(prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        vec!["/".to_string(), "/{*service_path}".to_string()]
    } else {
        vec![
            prefix.to_string(),
            format!("{prefix}/"),
            format!("{prefix}/{{*service_path}}"),
        ]
    }
}

/// GET routes would otherwise answer HEAD; the bridge only serves POST, GET and PUT.
async fn head_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,POST,PUT")],
    )
        .into_response()
}

/// Percent-decoded part of `path` below `prefix`.
fn route_suffix(path: &str, prefix: &str) -> String {
    let raw = path.strip_prefix(prefix).unwrap_or_default();
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

async fn bridge_route(State(route): State<RouteState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, route.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, path = %parts.uri.path(), "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let suffix = route_suffix(parts.uri.path(), &route.prefix);

    let request = Request::from_parts(parts, body);
    bridge::handle(request, &suffix, route.invoker.as_ref(), route.options).await
}
