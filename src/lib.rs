//! HTTP to rpcx bridge library.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use bridge::{InvocationError, InvocationResult, Invoker};
pub use config::schema::GatewayConfig;
pub use http::Server;
pub use lifecycle::Shutdown;
