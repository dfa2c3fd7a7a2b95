//! The list-query pipeline
//!
//! Raw query parameters go through four stages:
//!
//! 1. [`params::normalize`] validates them against the endpoint's schema,
//!    substituting defaults for anything invalid
//! 2. [`compose::compose`] refines the resource's base [`QueryState`] with the
//!    search, filter and sort steps, in that order
//! 3. [`pager::paginate`] counts the result and cuts one window from it
//! 4. the endpoint renders the resulting [`ListResponse`](crate::handlers::ListResponse)
//!
//! [`list`] runs stages 1 to 3 for a [`ListingProfile`].

pub mod compose;
pub mod pager;
pub mod params;
pub mod profiles;

use std::collections::HashMap;

use tracing::debug;

pub use compose::{compose, resolve_sort};
pub use pager::{paginate, PageRequest, PageResult};
pub use params::{normalize, ParamBag, ParamKind, ParamSchema, ParamSpec, ParamValue};
pub use profiles::{FilterSpec, ListingProfile};

use crate::repository::{QueryState, Record, Repository, RepositoryResult};

/// Run the pipeline for one list request
pub async fn list<E, R>(
    repository: &R,
    base: QueryState,
    raw: &HashMap<String, String>,
    profile: &ListingProfile,
) -> RepositoryResult<PageResult<E>>
where
    E: Record,
    R: Repository<E>,
{
    let params = normalize(raw, profile.schema);
    let query = compose(base, &params, profile);
    let request = PageRequest::from_params(&params);
    debug!(
        profile = profile.name,
        entity = E::ENTITY,
        page = request.page,
        per = request.per,
        filters = query.filters.len(),
        searching = query.search.is_some(),
        "list query composed"
    );
    paginate(repository, &query, request).await
}
