//! Store abstractions for forum entities
//!
//! Endpoints and the list pipeline reach persistence only through the traits
//! in this module. A [`QueryState`] describes what to fetch; a store evaluates
//! it together with a [`Pagination`] window and returns a counted [`Page`].
//!
//! # Features
//!
//! - **Generic reads**: [`Repository`] for lookup and counted windows
//! - **Resource writes**: [`ArticleRepository`], [`UserRepository`],
//!   [`CommentRepository`]
//! - **Query description**: [`QueryState`], [`FilterCondition`], [`TextSearch`],
//!   [`SortSpec`]
//! - **Reference store**: [`MemoryStore`], all tables behind one lock
//!
//! # Example
//!
//! ```rust,no_run
//! use forum_service::repository::{MemoryStore, Pagination, QueryState, Repository, ForumStore};
//!
//! # async fn example() -> forum_service::repository::RepositoryResult<()> {
//! let store = MemoryStore::new();
//! let page = store.articles().find_page(&QueryState::all(), Pagination::page(1, 10)).await?;
//! assert_eq!(page.total, 0);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod query;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::{MemoryArticles, MemoryComments, MemoryStore, MemoryUsers, StoreStats};
pub use query::{
    FilterCondition, FilterOperator, FilterValue, OrderDirection, Pagination, QueryState,
    SortSpec, TextSearch,
};
pub use traits::{
    ArticleRepository, CommentRepository, ForumStore, LikeOutcome, Page, Record, Repository,
    RepositoryResult, UserRepository,
};
