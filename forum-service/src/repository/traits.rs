//! Repository trait definitions
//!
//! Stores are external collaborators: the list pipeline and the endpoints only
//! talk to them through these traits. Methods use RPITIT (return position
//! `impl Trait` in traits) so implementations can be written as plain
//! `async fn`s without `async_trait`.
//!
//! - [`Record`]: field access used to evaluate predicates and orderings
//! - [`Repository`]: lookup and counted windowed listing
//! - [`ArticleRepository`], [`UserRepository`], [`CommentRepository`]: the
//!   resource-specific writes and deletes
//! - [`ForumStore`]: one handle per resource, sharing a transactional backend

use std::future::Future;

use super::error::RepositoryError;
use super::query::{FilterValue, Pagination, QueryState};
use crate::models::{
    Article, ArticleChanges, Comment, NewArticle, NewComment, NewUser, User, UserChanges,
};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// An entity that list queries can be evaluated against
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Stable identifier, also the tie-breaker for orderings
    fn id(&self) -> i64;

    /// Typed value of a named field, `None` when the field does not exist
    fn field(&self, name: &str) -> Option<FilterValue>;
}

/// One counted window of a query result
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    /// Number of entities matching the query before windowing
    pub total: u64,
    /// Entities inside the requested window, in query order
    pub items: Vec<E>,
}

/// Result of a like or unlike request
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOutcome {
    /// The article after the operation
    pub article: Article,
    /// `false` when the like already was in the requested state
    pub changed: bool,
}

/// Generic query capability for one resource
pub trait Repository<E: Record>: Send + Sync {
    /// Look up an entity by id
    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<E>>> + Send;

    /// Count the query and fetch one window of it from the same snapshot
    fn find_page(
        &self,
        query: &QueryState,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Page<E>>> + Send;
}

/// Article writes
///
/// Tags are a side collection of the article: every write that touches them
/// commits together with the primary attributes or not at all.
pub trait ArticleRepository: Repository<Article> {
    fn create_with_tags(
        &self,
        author_id: i64,
        article: NewArticle,
    ) -> impl Future<Output = RepositoryResult<Article>> + Send;

    /// Apply changes; `changes.tags = Some(..)` replaces the tag set
    fn update_with_tags(
        &self,
        id: i64,
        changes: ArticleChanges,
    ) -> impl Future<Output = RepositoryResult<Article>> + Send;

    /// Register a like; idempotent per (article, user)
    fn like(
        &self,
        article_id: i64,
        user_id: i64,
    ) -> impl Future<Output = RepositoryResult<LikeOutcome>> + Send;

    /// Remove a like; idempotent per (article, user)
    fn unlike(
        &self,
        article_id: i64,
        user_id: i64,
    ) -> impl Future<Output = RepositoryResult<LikeOutcome>> + Send;

    /// Delete an article with its comments, likes and taggings; `Ok(false)`
    /// when it did not exist
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// User writes
pub trait UserRepository: Repository<User> {
    fn create(&self, user: NewUser) -> impl Future<Output = RepositoryResult<User>> + Send;

    fn update(
        &self,
        id: i64,
        changes: UserChanges,
    ) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Delete a user and their likes; refused while they author articles
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// Comment writes
pub trait CommentRepository: Repository<Comment> {
    fn create(&self, comment: NewComment) -> impl Future<Output = RepositoryResult<Comment>> + Send;
}

/// A complete backing store, one repository handle per resource
pub trait ForumStore: Send + Sync + 'static {
    type Articles: ArticleRepository;
    type Users: UserRepository;
    type Comments: CommentRepository;

    fn articles(&self) -> &Self::Articles;

    fn users(&self) -> &Self::Users;

    fn comments(&self) -> &Self::Comments;

    /// Succeeds when the store can serve requests
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_result_type() {
        let ok_result: RepositoryResult<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: RepositoryResult<i32> =
            Err(RepositoryError::not_found("Article", "123"));
        assert!(err_result.is_err());
    }

    #[test]
    fn test_page_holds_total_separately_from_items() {
        let page = Page {
            total: 25,
            items: vec![1, 2, 3],
        };
        assert_eq!(page.total, 25);
        assert_eq!(page.items.len(), 3);
    }
}
