//! HTTP to rpcx request bridging.
//!
//! # Data Flow
//! ```text
//! Authorized HTTP request (headers, buffered body, route suffix)
//!     → service_path.rs (resolve X-RPCX-ServicePath, normalize suffix)
//!     → handler.rs (echo message ID / Authorization)
//!     → invoker.rs (external RPC call → metadata, payload, error)
//!     → handler.rs (merge metadata, build the single response)
//! ```
//!
//! # Design Decisions
//! - RPC failures are answered with status 200; the error travels in
//!   `X-RPCX-MessageStatusType` / `X-RPCX-ErrorMessage` headers
//! - The bridge never retries and never classifies invoker errors
//! - The response is assembled in full before it is returned

pub mod handler;
pub mod headers;
pub mod invoker;
pub mod service_path;

pub use handler::{handle, BridgeOptions};
pub use invoker::{InvocationError, InvocationResult, Invoker, Metadata};
pub use service_path::resolve_service_path;
