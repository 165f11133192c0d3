//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → auth::require_auth (bearer token check)
//!     → server.rs bridge route (buffer body, compute route suffix)
//!     → bridge::handle (rpcx translation)
//!     → Send to client
//! ```

pub mod server;

pub use server::Server;
