//! Entity lookup shared by the resource handlers

use super::{ApiError, ApiOperation};
use crate::repository::{Record, Repository};

/// Load an entity or fail with `404`
///
/// Runs before any authorization check, so a missing entity is reported as
/// missing whoever asks.
pub async fn fetch<E, R>(repository: &R, id: i64, operation: ApiOperation) -> Result<E, ApiError>
where
    E: Record,
    R: Repository<E>,
{
    repository
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::during(operation, e))?
        .ok_or_else(|| ApiError::not_found(E::ENTITY, id.to_string()).with_operation(operation))
}
