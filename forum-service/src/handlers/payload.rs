//! JSON body extractor with forum error semantics
//!
//! A body that cannot be read as the expected payload is a failed write, so
//! it answers like any other mutation failure: `422` with `error_code: 1`.

use axum::{
    extract::{FromRequest, Request},
    http::Method,
    Json,
};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiOperation};

/// Deserialized request body
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn operation_for(method: &Method) -> ApiOperation {
    match *method {
        Method::PUT | Method::PATCH => ApiOperation::Update,
        Method::DELETE => ApiOperation::Delete,
        _ => ApiOperation::Create,
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = operation_for(req.method());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => Err(ApiError::mutation_failed(
                operation,
                format!("unreadable request body: {}", rejection.body_text()),
            )),
        }
    }
}
