//! Bounded page extraction
//!
//! The pager asks the store for the total and the window in a single
//! [`Repository::find_page`] call, so both come from the same snapshot.

use super::params::{ParamBag, DEFAULT_PAGE, DEFAULT_PER};
use crate::handlers::{ListResponse, PageMeta};
use crate::repository::{Pagination, QueryState, Record, Repository, RepositoryResult};

/// A page of entities with its metadata
pub type PageResult<E> = ListResponse<E>;

/// Normalized page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per: u64,
}

impl PageRequest {
    /// Both values are at least 1
    pub fn new(page: u64, per: u64) -> Self {
        Self {
            page: page.max(1),
            per: per.max(1),
        }
    }

    /// Read `page` and `per` from a normalized bag
    pub fn from_params(params: &ParamBag) -> Self {
        let read = |name: &str, default: i64| {
            let value = params.integer(name).unwrap_or(default);
            u64::try_from(value).unwrap_or(1)
        };
        Self::new(read("page", DEFAULT_PAGE), read("per", DEFAULT_PER))
    }

    pub fn window(&self) -> Pagination {
        Pagination::page(self.page, self.per)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE as u64, DEFAULT_PER as u64)
    }
}

/// Fetch one page of a query
pub async fn paginate<E, R>(
    repository: &R,
    query: &QueryState,
    request: PageRequest,
) -> RepositoryResult<PageResult<E>>
where
    E: Record,
    R: Repository<E>,
{
    let page = repository.find_page(query, request.window()).await?;
    let meta = PageMeta::new(request.page, request.per, page.total);
    Ok(ListResponse::new(page.items, meta))
}
