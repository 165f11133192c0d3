//! Bearer token authorization for bridge routes.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → middleware.rs (extract "Authorization: Bearer <token>")
//!     → Authorizator::authorize (jwt.rs by default)
//!     → Claims attached to request extensions
//!     → bridge handler
//! ```
//!
//! # Design Decisions
//! - Unauthenticated requests never reach the bridge
//! - Challenge is a 401 with `WWW-Authenticate` and a small JSON body
//! - Rejection reasons are logged at debug, clients get a generic message

pub mod jwt;
pub mod middleware;

use serde::{Deserialize, Serialize};

pub use jwt::JwtAuthorizator;
pub use middleware::{require_auth, AuthState};

/// Claims carried by an accepted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to.
    pub sub: String,
    /// Expiration, seconds since the epoch.
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("auth header is empty")]
    MissingToken,

    #[error("auth header is malformed")]
    MalformedHeader,

    #[error("token is invalid or expired")]
    InvalidToken,
}

/// Validates bearer credentials.
pub trait Authorizator: Send + Sync {
    /// Validate `token` (without the `Bearer ` prefix).
    fn authorize(&self, token: &str) -> Result<Claims, AuthError>;
}
