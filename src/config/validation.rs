//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and route bases
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("route '{name}' base '{base}' must start with '/'")]
    InvalidBase { name: String, base: String },

    #[error("route '{name}' base '{base}' must not contain '{{', '}}' or '*'")]
    BaseSyntax { name: String, base: String },

    #[error("route base '{0}' is registered more than once")]
    DuplicateBase(String),

    #[error("route name must not be empty")]
    EmptyRouteName,

    #[error("upstream address '{0}' must be an http URL")]
    InvalidUpstream(String),

    #[error("auth secret must be set")]
    MissingSecret,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("timeouts.request_secs ({request_secs}) must exceed upstream.timeout_secs ({upstream_secs})")]
    TimeoutOrder { request_secs: u64, upstream_secs: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName);
        }
        if !route.base.starts_with('/') {
            errors.push(ValidationError::InvalidBase {
                name: route.name.clone(),
                base: route.base.clone(),
            });
            continue;
        }
        if route.base.contains(['{', '}', '*']) {
            errors.push(ValidationError::BaseSyntax {
                name: route.name.clone(),
                base: route.base.clone(),
            });
            continue;
        }
        let normalized = route.base.trim_end_matches('/');
        if !seen.insert(normalized.to_string()) {
            errors.push(ValidationError::DuplicateBase(route.base.clone()));
        }
    }

    match url::Url::parse(&config.upstream.address) {
        Ok(url) if url.scheme() == "http" && url.host().is_some() => {}
        _ => errors.push(ValidationError::InvalidUpstream(config.upstream.address.clone())),
    }

    if config.auth.secret.is_empty() {
        errors.push(ValidationError::MissingSecret);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.timeout_secs"));
    }
    // The upstream timeout must fire before the request timeout layer.
    if config.timeouts.request_secs > 0
        && config.upstream.timeout_secs > 0
        && config.timeouts.request_secs <= config.upstream.timeout_secs
    {
        errors.push(ValidationError::TimeoutOrder {
            request_secs: config.timeouts.request_secs,
            upstream_secs: config.upstream.timeout_secs,
        });
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero("limits.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
