//! HS256 JWT validation.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::{AuthError, Authorizator, Claims};
use crate::config::AuthConfig;

/// Authorizator accepting HS256 tokens signed with a shared secret.
pub struct JwtAuthorizator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthorizator {
    pub fn new(secret: &[u8], issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.secret.as_bytes(),
            config.issuer.as_deref(),
            config.leeway_secs,
        )
    }
}

impl Authorizator for JwtAuthorizator {
    fn authorize(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AuthError::InvalidToken
        })?;
        Ok(data.claims)
    }
}
