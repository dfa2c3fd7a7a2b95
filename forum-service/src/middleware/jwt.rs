//! JWT identity middleware
//!
//! The middleware never rejects a request. A valid bearer token has its
//! [`Claims`] stored in the request extensions for the
//! [`Actor`](crate::auth::Actor) extractor. A missing, malformed or invalid
//! token leaves the request anonymous, so public reads still answer and
//! routes that need an actor answer `401`.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::{fs, sync::Arc};

use super::token::{extract_token, Claims, TokenValidator};
use crate::{config::JwtConfig, error::Error};

/// JWT authentication middleware state
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        let key_material = read_key_material(config)?;

        let decoding_key = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                DecodingKey::from_rsa_pem(&key_material)?
            }
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(&key_material)?,
            _ => DecodingKey::from_secret(&key_material),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        }

        Ok(Self {
            decoding_key: Arc::new(decoding_key),
            validation,
        })
    }

    /// Validate an optional bearer token and inject its claims
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request<Body>,
        next: Next,
    ) -> Response {
        let path = request.uri().path();
        if path == "/health" || path == "/ready" {
            return next.run(request).await;
        }

        match auth.identify(request.headers()) {
            Ok(Some(claims)) => {
                tracing::debug!(subject = %claims.sub, "bearer token accepted");
                request.extensions_mut().insert(claims);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid bearer token");
            }
        }

        next.run(request).await
    }

    /// Claims of the request's bearer token, `None` when it carries none
    fn identify(&self, headers: &HeaderMap) -> Result<Option<Claims>, Error> {
        extract_token(headers)?
            .map(|token| self.validate_token(&token))
            .transpose()
    }
}

impl TokenValidator for JwtAuth {
    fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, Error> {
    let algorithm = match name.to_uppercase().as_str() {
        "RS256" => Algorithm::RS256,
        "RS384" => Algorithm::RS384,
        "RS512" => Algorithm::RS512,
        "ES256" => Algorithm::ES256,
        "ES384" => Algorithm::ES384,
        "HS256" => Algorithm::HS256,
        "HS384" => Algorithm::HS384,
        "HS512" => Algorithm::HS512,
        alg => {
            return Err(Error::Config(Box::new(figment::Error::from(format!(
                "Unsupported JWT algorithm: {alg}"
            )))))
        }
    };
    Ok(algorithm)
}

/// Inline secret first, then the key file
pub(crate) fn read_key_material(config: &JwtConfig) -> Result<Vec<u8>, Error> {
    if let Some(secret) = config.secret.as_deref().filter(|s| !s.is_empty()) {
        return Ok(secret.as_bytes().to_vec());
    }

    let Some(path) = &config.secret_path else {
        return Err(Error::Config(Box::new(figment::Error::from(
            "JWT key missing: set jwt.secret or jwt.secret_path".to_string(),
        ))));
    };

    fs::read(path).map_err(|e| {
        Error::Config(Box::new(figment::Error::from(format!(
            "Failed to read JWT key from '{}': {e}",
            path.display()
        ))))
    })
}
