//! Bearer token claims and extraction

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const USER_SUBJECT_PREFIX: &str = "user:";

/// Claims carried by a forum access token
///
/// The subject names the authenticated member as `user:<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,

    /// Display name at issue time, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Claims for a member, expiring at `exp`
    pub fn for_user(user_id: i64, exp: i64) -> Self {
        Self {
            sub: subject_for(user_id),
            name: None,
            exp,
            iat: None,
            iss: None,
            aud: None,
        }
    }

    /// Numeric member id, if the subject is a well-formed user subject
    pub fn user_id(&self) -> Option<i64> {
        self.sub
            .strip_prefix(USER_SUBJECT_PREFIX)
            .and_then(|id| id.parse().ok())
            .filter(|id: &i64| *id > 0)
    }
}

/// Subject string for a member id
pub fn subject_for(user_id: i64) -> String {
    format!("{USER_SUBJECT_PREFIX}{user_id}")
}

/// Validates a raw token into claims
pub trait TokenValidator: Send + Sync + Clone {
    fn validate_token(&self, token: &str) -> Result<Claims, Error>;
}

/// Extract the bearer token, `None` when no Authorization header is sent
pub fn extract_token(headers: &HeaderMap) -> Result<Option<String>, Error> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header = value
        .to_str()
        .map_err(|_| Error::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(Error::Unauthorized(
            "Invalid Authorization header format".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_claims_user_id() {
        let claims = Claims::for_user(123, 0);
        assert_eq!(claims.sub, "user:123");
        assert_eq!(claims.user_id(), Some(123));
    }

    #[test]
    fn test_malformed_subjects_have_no_user_id() {
        for sub in ["client:abc", "user:abc", "user:-4", "user:0", "123"] {
            let claims = Claims {
                sub: sub.to_string(),
                ..Claims::for_user(1, 0)
            };
            assert_eq!(claims.user_id(), None, "{sub}");
        }
    }

    #[test]
    fn test_extract_token_absent_header() {
        assert_eq!(extract_token(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_token(&headers).unwrap().as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(matches!(extract_token(&headers), Err(Error::Unauthorized(_))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_token(&headers).is_err());
    }
}
