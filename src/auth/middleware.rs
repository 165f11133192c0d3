//! Authorization middleware guarding bridge routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::{AuthError, Authorizator};

/// State shared by the middleware of every route.
#[derive(Clone)]
pub struct AuthState {
    pub authorizator: Arc<dyn Authorizator>,
    pub realm: Arc<str>,
}

impl AuthState {
    pub fn new(authorizator: Arc<dyn Authorizator>, realm: &str) -> Self {
        Self {
            authorizator,
            realm: Arc::from(realm),
        }
    }
}

/// Reject requests without a valid bearer token; attach `Claims` otherwise.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(e) => return unauthorized(&state.realm, &e),
    };

    match state.authorizator.authorize(token) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, "Request authorized");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Request rejected");
            unauthorized(&state.realm, &e)
        }
    }
}

fn bearer_token(request: &Request<Body>) -> Result<&str, AuthError> {
    let value = match request.headers().get(header::AUTHORIZATION) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthError::MissingToken),
    };
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::MalformedHeader),
    }
}

fn unauthorized(realm: &str, error: &AuthError) -> Response {
    let challenge = HeaderValue::from_str(&format!("JWT realm=\"{realm}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("JWT"));
    let body = serde_json::json!({
        "code": StatusCode::UNAUTHORIZED.as_u16(),
        "message": error.to_string(),
    });

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, challenge)],
        Json(body),
    )
        .into_response()
}
