//! Entity id path extractor
//!
//! Ids are integers. A path segment that is not one cannot name an existing
//! entity, so it answers `404` with the entity type like any unknown id.

use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, Method},
};

use super::{ApiError, ApiOperation};
use crate::repository::Record;

/// The `{id}` path segment of an `E` route
#[derive(Debug)]
pub struct RecordId<E>(pub i64, pub PhantomData<fn() -> E>);

fn operation_for(method: &Method) -> ApiOperation {
    match *method {
        Method::GET | Method::HEAD => ApiOperation::Get,
        Method::PUT | Method::PATCH => ApiOperation::Update,
        Method::DELETE => ApiOperation::Delete,
        _ => ApiOperation::Create,
    }
}

impl<S, E> FromRequestParts<S> for RecordId<E>
where
    S: Send + Sync,
    E: Record,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let operation = operation_for(&parts.method);
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::internal(format!("route has no id segment: {}", rejection.body_text()))
                    .with_operation(operation)
            })?;

        match raw.parse::<i64>() {
            Ok(id) => Ok(RecordId(id, PhantomData)),
            Err(_) => {
                tracing::debug!(entity = E::ENTITY, id = %raw, "non-numeric id in path");
                Err(ApiError::not_found(E::ENTITY, raw).with_operation(operation))
            }
        }
    }
}
