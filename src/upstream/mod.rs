//! Forwarding invocations to an rpcx HTTP endpoint.
//!
//! # Data Flow
//! ```text
//! Bridged request (body, X-RPCX-* headers, resolved service path)
//!     → client.rs (POST to the configured endpoint, bounded by a timeout)
//!     → rpcx response headers/body
//!     → InvocationResult (metadata, payload or error)
//! ```
//!
//! # Design Decisions
//! - One attempt per request; the endpoint decides how the call fails
//! - rpcx reports service errors in headers, not in the HTTP status

pub mod client;

pub use client::HttpInvoker;
