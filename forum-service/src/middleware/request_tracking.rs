//! Request ID generation and propagation
//!
//! Every request gets an ID in the configured header (an incoming one is
//! kept), the same ID is echoed on the response, and credential headers are
//! marked sensitive so the trace layer never prints them.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Time-sortable request IDs of the form `req-<uuid v7>`
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeForumRequestId;

impl MakeRequestId for MakeForumRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("req-{}", Uuid::now_v7());
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::try_from(name)
        .map_err(|e| Error::BadRequest(format!("invalid request id header '{name}': {e}")))
}

pub fn request_id_layer(header: &str) -> Result<SetRequestIdLayer<MakeForumRequestId>> {
    Ok(SetRequestIdLayer::new(header_name(header)?, MakeForumRequestId))
}

pub fn request_id_propagation_layer(header: &str) -> Result<PropagateRequestIdLayer> {
    Ok(PropagateRequestIdLayer::new(header_name(header)?))
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .map(|h| HeaderName::from_static(h))
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique_and_prefixed() {
        let mut maker = MakeForumRequestId;
        let request = Request::builder().body(()).unwrap();

        let first = maker.make_request_id(&request).unwrap().into_header_value();
        let second = maker.make_request_id(&request).unwrap().into_header_value();
        assert!(first.to_str().unwrap().starts_with("req-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        assert!(request_id_layer("x-request-id").is_ok());
        assert!(request_id_layer("bad header").is_err());
    }

    #[test]
    fn test_sensitive_headers_constant() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
    }
}
