//! Access token issuing for HMAC deployments
//!
//! With a shared secret the service can mint the same tokens it accepts,
//! which operators use for bootstrap accounts and the test suite uses to
//! drive the API. Asymmetric deployments issue tokens elsewhere.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::config::JwtConfig;
use crate::error::Error;
use crate::middleware::jwt::{parse_algorithm, read_key_material};
use crate::middleware::Claims;

const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: Arc<EncodingKey>,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(Error::Config(Box::new(figment::Error::from(format!(
                "Token issuing needs an HMAC algorithm, not {algorithm:?}"
            )))));
        }
        let secret = read_key_material(config)?;

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(&secret)),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: DEFAULT_LIFETIME,
        })
    }

    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Mint a token whose subject is `user:<user_id>`
    pub fn issue_for(&self, user_id: i64) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            iat: Some(now),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            ..Claims::for_user(user_id, now.saturating_add(lifetime))
        };
        self.issue(&claims)
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, Error> {
        let header = Header::new(self.algorithm);
        Ok(encode(&header, claims, &self.encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{JwtAuth, TokenValidator};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: Some("issuer-secret".to_string()),
            issuer: Some("forum".to_string()),
            audience: Some("forum-clients".to_string()),
            ..JwtConfig::default()
        }
    }

    #[test]
    fn test_issued_tokens_validate() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let auth = JwtAuth::new(&config()).unwrap();

        let claims = auth.validate_token(&issuer.issue_for(12).unwrap()).unwrap();
        assert_eq!(claims.user_id(), Some(12));
        assert_eq!(claims.iss.as_deref(), Some("forum"));
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let result = TokenIssuer::new(&JwtConfig {
            algorithm: "RS256".to_string(),
            ..config()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
