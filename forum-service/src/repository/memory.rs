//! In-memory reference store
//!
//! All tables live behind a single `tokio::sync::RwLock`. Reads evaluate a
//! whole query (count and window) under one read guard; every write validates
//! and stages its changes first and only then applies them under the same
//! write guard, so no reader ever observes a half-applied write.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::error::{RepositoryError, RepositoryOperation};
use super::query::{Pagination, QueryState};
use super::traits::{
    ArticleRepository, CommentRepository, ForumStore, LikeOutcome, Page, Record, Repository,
    RepositoryResult, UserRepository,
};
use crate::models::user::blank_to_none;
use crate::models::{
    normalize_tags, Article, ArticleChanges, Comment, NewArticle, NewComment, NewUser, User,
    UserChanges, COMMENTABLE_ARTICLE, DEFAULT_ARTICLE_STATUS, DEFAULT_ARTICLE_TYPE,
    DEFAULT_GENDER, DEFAULT_ROLE, DEFAULT_STATUS,
};

/// Row counts, mostly useful to assert that a failed write left nothing behind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub articles: usize,
    pub users: usize,
    pub comments: usize,
    pub likes: usize,
    pub tags: usize,
    pub taggings: usize,
}

#[derive(Debug, Default)]
struct Tables {
    // Stored without tags; `taggings` is authoritative.
    articles: BTreeMap<i64, Article>,
    users: BTreeMap<i64, User>,
    comments: BTreeMap<i64, Comment>,
    /// (article_id, user_id)
    likes: BTreeSet<(i64, i64)>,
    tag_names: BTreeMap<i64, String>,
    tag_ids: HashMap<String, i64>,
    /// article_id -> tag ids in the order they were given
    taggings: BTreeMap<i64, Vec<i64>>,
    last_article_id: i64,
    last_user_id: i64,
    last_comment_id: i64,
    last_tag_id: i64,
}

#[derive(Debug, Default)]
struct StagedTags {
    ids: Vec<i64>,
    created: Vec<(i64, String)>,
    last_tag_id: i64,
}

impl Tables {
    fn article(&self, id: i64) -> Option<Article> {
        self.articles.get(&id).map(|article| self.hydrate(article))
    }

    fn hydrate(&self, article: &Article) -> Article {
        let mut article = article.clone();
        article.tags = self
            .taggings
            .get(&article.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tag_names.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        article
    }

    /// Resolve tag names to ids, allocating ids for unknown names without
    /// touching the tables
    fn stage_tags(&self, names: &[String]) -> StagedTags {
        let mut staged = StagedTags {
            last_tag_id: self.last_tag_id,
            ..StagedTags::default()
        };
        for name in names {
            let id = match self.tag_ids.get(name) {
                Some(id) => *id,
                None => {
                    staged.last_tag_id += 1;
                    staged.created.push((staged.last_tag_id, name.clone()));
                    staged.last_tag_id
                }
            };
            staged.ids.push(id);
        }
        staged
    }

    fn commit_tags(&mut self, article_id: i64, staged: StagedTags) {
        for (id, name) in staged.created {
            self.tag_ids.insert(name.clone(), id);
            self.tag_names.insert(id, name);
        }
        self.last_tag_id = staged.last_tag_id;
        if staged.ids.is_empty() {
            self.taggings.remove(&article_id);
        } else {
            self.taggings.insert(article_id, staged.ids);
        }
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            articles: self.articles.len(),
            users: self.users.len(),
            comments: self.comments.len(),
            likes: self.likes.len(),
            tags: self.tag_names.len(),
            taggings: self.taggings.values().map(Vec::len).sum(),
        }
    }
}

#[derive(Debug)]
struct Shared {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Shared {
    fn check(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(RepositoryError::unavailable(operation, "store is offline"))
        }
    }

    async fn read(
        &self,
        operation: RepositoryOperation,
    ) -> RepositoryResult<RwLockReadGuard<'_, Tables>> {
        self.check(operation)?;
        Ok(self.tables.read().await)
    }

    async fn write(
        &self,
        operation: RepositoryOperation,
    ) -> RepositoryResult<RwLockWriteGuard<'_, Tables>> {
        self.check(operation)?;
        Ok(self.tables.write().await)
    }
}

/// Filter, order and window a set of records
fn evaluate<E: Record>(
    records: impl Iterator<Item = E>,
    query: &QueryState,
    pagination: Pagination,
) -> Page<E> {
    let mut matching: Vec<E> = records.filter(|record| query.matches(record)).collect();
    matching.sort_by(|a, b| query.compare(a, b));
    let total = matching.len() as u64;
    let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
    let items = matching.into_iter().skip(offset).take(limit).collect();
    Page { total, items }
}

fn not_found<E: Record>(id: i64, operation: RepositoryOperation) -> RepositoryError {
    RepositoryError::not_found(E::ENTITY, id.to_string()).with_operation(operation)
}

fn trimmed(value: Option<String>) -> String {
    value.map(|text| text.trim().to_string()).unwrap_or_default()
}

/// Article handle of a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryArticles {
    shared: Arc<Shared>,
}

/// User handle of a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryUsers {
    shared: Arc<Shared>,
}

/// Comment handle of a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryComments {
    shared: Arc<Shared>,
}

/// Process-local store for all forum resources
#[derive(Debug, Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    articles: MemoryArticles,
    users: MemoryUsers,
    comments: MemoryComments,
}

impl MemoryStore {
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        });
        Self {
            articles: MemoryArticles {
                shared: Arc::clone(&shared),
            },
            users: MemoryUsers {
                shared: Arc::clone(&shared),
            },
            comments: MemoryComments {
                shared: Arc::clone(&shared),
            },
            shared,
        }
    }

    /// Take the store offline or bring it back; offline operations fail as unavailable
    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::Release);
    }

    pub fn is_available(&self) -> bool {
        self.shared.available.load(Ordering::Acquire)
    }

    pub async fn stats(&self) -> StoreStats {
        self.shared.tables.read().await.stats()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ForumStore for MemoryStore {
    type Articles = MemoryArticles;
    type Users = MemoryUsers;
    type Comments = MemoryComments;

    fn articles(&self) -> &Self::Articles {
        &self.articles
    }

    fn users(&self) -> &Self::Users {
        &self.users
    }

    fn comments(&self) -> &Self::Comments {
        &self.comments
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.shared.read(RepositoryOperation::Count).await.map(|_| ())
    }
}

impl Repository<Article> for MemoryArticles {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Article>> {
        let tables = self.shared.read(RepositoryOperation::FindById).await?;
        Ok(tables.article(id))
    }

    async fn find_page(
        &self,
        query: &QueryState,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Article>> {
        let tables = self.shared.read(RepositoryOperation::FindPage).await?;
        let articles = tables.articles.values().map(|article| tables.hydrate(article));
        Ok(evaluate(articles, query, pagination))
    }
}

impl ArticleRepository for MemoryArticles {
    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let mut guard = self.shared.write(RepositoryOperation::Delete).await?;
        let tables = &mut *guard;
        if tables.articles.remove(&id).is_none() {
            return Ok(false);
        }
        let comments_before = tables.comments.len();
        tables.comments.retain(|_, comment| comment.commentable_id != id);
        tables.likes.retain(|(article_id, _)| *article_id != id);
        tables.taggings.remove(&id);
        debug!(
            article_id = id,
            comments_removed = comments_before - tables.comments.len(),
            "article deleted"
        );
        Ok(true)
    }

    async fn create_with_tags(&self, author_id: i64, article: NewArticle) -> RepositoryResult<Article> {
        let operation = RepositoryOperation::Create;
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        article.validate()?;
        if !tables.users.contains_key(&author_id) {
            return Err(
                RepositoryError::constraint_violation(operation, "author does not exist")
                    .with_entity(User::ENTITY, author_id.to_string()),
            );
        }

        let id = tables.last_article_id + 1;
        let tag_names = article.tags.as_deref().map(normalize_tags).unwrap_or_default();
        let staged = tables.stage_tags(&tag_names);
        let now = Utc::now();
        let record = Article {
            id,
            title: trimmed(article.title),
            content: article.content.unwrap_or_default(),
            status: article
                .status
                .unwrap_or_else(|| DEFAULT_ARTICLE_STATUS.to_string()),
            article_type: article
                .article_type
                .unwrap_or_else(|| DEFAULT_ARTICLE_TYPE.to_string()),
            user_id: author_id,
            tags: Vec::new(),
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        };

        tables.last_article_id = id;
        tables.commit_tags(id, staged);
        tables.articles.insert(id, record);
        debug!(article_id = id, author_id, tags = tag_names.len(), "article created");

        tables.article(id).ok_or_else(|| not_found::<Article>(id, operation))
    }

    async fn update_with_tags(&self, id: i64, changes: ArticleChanges) -> RepositoryResult<Article> {
        let operation = RepositoryOperation::Update;
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        changes.validate()?;
        let mut article = tables
            .articles
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<Article>(id, operation))?;
        let staged = changes
            .tags
            .as_deref()
            .map(|tags| tables.stage_tags(&normalize_tags(tags)));

        if let Some(title) = changes.title {
            article.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            article.content = content;
        }
        if let Some(status) = changes.status {
            article.status = status;
        }
        if let Some(article_type) = changes.article_type {
            article.article_type = article_type;
        }
        article.updated_at = Utc::now();

        if let Some(staged) = staged {
            tables.commit_tags(id, staged);
        }
        tables.articles.insert(id, article);
        debug!(article_id = id, "article updated");

        tables.article(id).ok_or_else(|| not_found::<Article>(id, operation))
    }

    async fn like(&self, article_id: i64, user_id: i64) -> RepositoryResult<LikeOutcome> {
        self.set_like(article_id, user_id, true).await
    }

    async fn unlike(&self, article_id: i64, user_id: i64) -> RepositoryResult<LikeOutcome> {
        self.set_like(article_id, user_id, false).await
    }
}

impl MemoryArticles {
    async fn set_like(&self, article_id: i64, user_id: i64, liked: bool) -> RepositoryResult<LikeOutcome> {
        let operation = if liked {
            RepositoryOperation::Like
        } else {
            RepositoryOperation::Unlike
        };
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        if !tables.articles.contains_key(&article_id) {
            return Err(not_found::<Article>(article_id, operation));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(
                RepositoryError::constraint_violation(operation, "user does not exist")
                    .with_entity(User::ENTITY, user_id.to_string()),
            );
        }

        let key = (article_id, user_id);
        let changed = if liked {
            tables.likes.insert(key)
        } else {
            tables.likes.remove(&key)
        };
        if changed {
            if let Some(article) = tables.articles.get_mut(&article_id) {
                article.likes_count = if liked {
                    article.likes_count + 1
                } else {
                    (article.likes_count - 1).max(0)
                };
            }
        }
        debug!(article_id, user_id, liked, changed, "like state set");

        let article = tables
            .article(article_id)
            .ok_or_else(|| not_found::<Article>(article_id, operation))?;
        Ok(LikeOutcome { article, changed })
    }
}

impl Repository<User> for MemoryUsers {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let tables = self.shared.read(RepositoryOperation::FindById).await?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_page(
        &self,
        query: &QueryState,
        pagination: Pagination,
    ) -> RepositoryResult<Page<User>> {
        let tables = self.shared.read(RepositoryOperation::FindPage).await?;
        Ok(evaluate(tables.users.values().cloned(), query, pagination))
    }
}

impl UserRepository for MemoryUsers {
    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let operation = RepositoryOperation::Delete;
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables.articles.values().any(|article| article.user_id == id) {
            return Err(
                RepositoryError::constraint_violation(operation, "user still authors articles")
                    .with_entity(User::ENTITY, id.to_string()),
            );
        }

        tables.users.remove(&id);
        let liked: Vec<i64> = tables
            .likes
            .iter()
            .filter(|(_, user_id)| *user_id == id)
            .map(|(article_id, _)| *article_id)
            .collect();
        for article_id in liked {
            tables.likes.remove(&(article_id, id));
            if let Some(article) = tables.articles.get_mut(&article_id) {
                article.likes_count = (article.likes_count - 1).max(0);
            }
        }
        debug!(user_id = id, "user deleted");
        Ok(true)
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut guard = self.shared.write(RepositoryOperation::Create).await?;
        let tables = &mut *guard;

        user.validate()?;
        let id = tables.last_user_id + 1;
        let now = Utc::now();
        let record = User {
            id,
            name: trimmed(user.name),
            nickname: blank_to_none(user.nickname),
            gender: user.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            avatar: blank_to_none(user.avatar),
            role: user.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            status: user.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            description: blank_to_none(user.description),
            created_at: now,
            updated_at: now,
        };
        tables.last_user_id = id;
        tables.users.insert(id, record.clone());
        debug!(user_id = id, "user created");
        Ok(record)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepositoryResult<User> {
        let operation = RepositoryOperation::Update;
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        changes.validate()?;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| not_found::<User>(id, operation))?;

        if let Some(name) = changes.name {
            user.name = name.trim().to_string();
        }
        if changes.nickname.is_some() {
            user.nickname = blank_to_none(changes.nickname);
        }
        if let Some(gender) = changes.gender {
            user.gender = gender;
        }
        if changes.avatar.is_some() {
            user.avatar = blank_to_none(changes.avatar);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        if changes.description.is_some() {
            user.description = blank_to_none(changes.description);
        }
        user.updated_at = Utc::now();
        debug!(user_id = id, "user updated");
        Ok(user.clone())
    }
}

impl Repository<Comment> for MemoryComments {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Comment>> {
        let tables = self.shared.read(RepositoryOperation::FindById).await?;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn find_page(
        &self,
        query: &QueryState,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Comment>> {
        let tables = self.shared.read(RepositoryOperation::FindPage).await?;
        Ok(evaluate(tables.comments.values().cloned(), query, pagination))
    }
}

impl CommentRepository for MemoryComments {
    async fn create(&self, comment: NewComment) -> RepositoryResult<Comment> {
        let operation = RepositoryOperation::Create;
        let mut guard = self.shared.write(operation).await?;
        let tables = &mut *guard;

        comment.validate()?;
        let article_id = comment.article_id;
        if !tables.articles.contains_key(&article_id) {
            return Err(not_found::<Article>(article_id, operation));
        }
        if let Some(parent_id) = comment.parent_id {
            let same_article = tables
                .comments
                .get(&parent_id)
                .is_some_and(|parent| parent.commentable_id == article_id);
            if !same_article {
                return Err(RepositoryError::constraint_violation(
                    operation,
                    "parent comment does not belong to this article",
                )
                .with_entity(Comment::ENTITY, parent_id.to_string()));
            }
        }

        let id = tables.last_comment_id + 1;
        let record = Comment {
            id,
            description: trimmed(comment.description),
            parent_id: comment.parent_id,
            user_id: comment.author.id,
            user_name: comment.author.name,
            user_avatar: comment.author.avatar,
            commentable_id: article_id,
            commentable_type: COMMENTABLE_ARTICLE.to_string(),
            created_at: Utc::now(),
        };
        tables.last_comment_id = id;
        tables.comments.insert(id, record.clone());
        if let Some(article) = tables.articles.get_mut(&article_id) {
            article.comments_count += 1;
        }
        debug!(comment_id = id, article_id, "comment created");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentAuthor, CommentDraft};
    use crate::repository::{FilterCondition, OrderDirection, RepositoryErrorKind, SortSpec};

    async fn seed_user(store: &MemoryStore, name: &str) -> User {
        store
            .users()
            .create(NewUser {
                name: Some(name.to_string()),
                ..NewUser::default()
            })
            .await
            .unwrap()
    }

    fn new_article(title: Option<&str>, tags: &[&str]) -> NewArticle {
        NewArticle {
            title: title.map(str::to_string),
            content: Some("body".to_string()),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            ..NewArticle::default()
        }
    }

    fn author(user: &User) -> CommentAuthor {
        CommentAuthor {
            id: user.id,
            name: user.display_name().to_string(),
            avatar: user.avatar.clone(),
        }
    }

    #[tokio::test]
    async fn test_create_article_with_tags_and_defaults() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;

        let article = store
            .articles()
            .create_with_tags(user.id, new_article(Some(" Hello "), &["rust", " tokio", "rust"]))
            .await
            .unwrap();

        assert_eq!(article.id, 1);
        assert_eq!(article.title, "Hello");
        assert_eq!(article.status, "published");
        assert_eq!(article.article_type, "article");
        assert_eq!(article.tags, vec!["rust".to_string(), "tokio".to_string()]);
        let stats = store.stats().await;
        assert_eq!((stats.tags, stats.taggings), (2, 2));
    }

    #[tokio::test]
    async fn test_invalid_article_writes_nothing() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;

        let err = store
            .articles()
            .create_with_tags(user.id, new_article(None, &["rust", "tokio"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind, RepositoryErrorKind::ValidationFailed);
        let stats = store.stats().await;
        assert_eq!((stats.articles, stats.tags, stats.taggings), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_tags() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        let article = store
            .articles()
            .create_with_tags(user.id, new_article(Some("T"), &["rust"]))
            .await
            .unwrap();

        let changes = ArticleChanges {
            status: Some("archived".to_string()),
            tags: Some(vec!["go".to_string()]),
            ..ArticleChanges::default()
        };
        assert!(store.articles().update_with_tags(article.id, changes).await.is_err());

        let stored = store.articles().find_by_id(article.id).await.unwrap().unwrap();
        assert_eq!(stored.tags, vec!["rust".to_string()]);
        assert_eq!(stored.status, "published");
        assert_eq!(store.stats().await.tags, 1);
    }

    #[tokio::test]
    async fn test_update_replaces_tags() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        let article = store
            .articles()
            .create_with_tags(user.id, new_article(Some("T"), &["rust", "tokio"]))
            .await
            .unwrap();

        let updated = store
            .articles()
            .update_with_tags(
                article.id,
                ArticleChanges {
                    tags: Some(vec!["axum".to_string()]),
                    ..ArticleChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.tags, vec!["axum".to_string()]);
        assert_eq!(updated.title, "T");
        assert_eq!(store.stats().await.taggings, 1);
    }

    #[tokio::test]
    async fn test_like_and_unlike_are_idempotent() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        let article = store
            .articles()
            .create_with_tags(user.id, new_article(Some("T"), &[]))
            .await
            .unwrap();

        let first = store.articles().like(article.id, user.id).await.unwrap();
        let second = store.articles().like(article.id, user.id).await.unwrap();
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(second.article.likes_count, 1);

        let removed = store.articles().unlike(article.id, user.id).await.unwrap();
        let again = store.articles().unlike(article.id, user.id).await.unwrap();
        assert!(removed.changed);
        assert!(!again.changed);
        assert_eq!(again.article.likes_count, 0);
    }

    #[tokio::test]
    async fn test_delete_article_cascades() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        let article = store
            .articles()
            .create_with_tags(user.id, new_article(Some("T"), &["rust"]))
            .await
            .unwrap();
        store.articles().like(article.id, user.id).await.unwrap();
        let draft = CommentDraft {
            description: Some("hi".to_string()),
            parent_id: None,
        };
        store
            .comments()
            .create(NewComment::new(draft, author(&user), article.id))
            .await
            .unwrap();

        assert!(store.articles().delete(article.id).await.unwrap());
        assert!(!store.articles().delete(article.id).await.unwrap());

        let stats = store.stats().await;
        assert_eq!((stats.articles, stats.comments, stats.likes, stats.taggings), (0, 0, 0, 0));
    }

    #[tokio::test]
    async fn test_user_with_articles_cannot_be_deleted() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        store
            .articles()
            .create_with_tags(user.id, new_article(Some("T"), &[]))
            .await
            .unwrap();

        let err = store.users().delete(user.id).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(store.stats().await.users, 1);
    }

    #[tokio::test]
    async fn test_comment_parent_must_share_article() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        let first = store
            .articles()
            .create_with_tags(user.id, new_article(Some("A"), &[]))
            .await
            .unwrap();
        let second = store
            .articles()
            .create_with_tags(user.id, new_article(Some("B"), &[]))
            .await
            .unwrap();
        let parent = store
            .comments()
            .create(NewComment::new(
                CommentDraft {
                    description: Some("root".to_string()),
                    parent_id: None,
                },
                author(&user),
                first.id,
            ))
            .await
            .unwrap();

        let foreign = NewComment::new(
            CommentDraft {
                description: Some("reply".to_string()),
                parent_id: Some(parent.id),
            },
            author(&user),
            second.id,
        );
        let err = store.comments().create(foreign).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);

        let reply = NewComment::new(
            CommentDraft {
                description: Some("reply".to_string()),
                parent_id: Some(parent.id),
            },
            author(&user),
            first.id,
        );
        assert!(store.comments().create(reply).await.is_ok());
        let article = store.articles().find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(article.comments_count, 2);
    }

    #[tokio::test]
    async fn test_find_page_counts_before_windowing() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "alice").await;
        for i in 0..7 {
            store
                .articles()
                .create_with_tags(user.id, new_article(Some(&format!("A{i}")), &[]))
                .await
                .unwrap();
        }
        let query = QueryState::all()
            .with_filter(FilterCondition::gte("id", 2_i64))
            .with_sort(SortSpec::new("id", OrderDirection::Descending));

        let page = store
            .articles()
            .find_page(&query, Pagination::page(2, 4))
            .await
            .unwrap();
        assert_eq!(page.total, 6);
        let ids: Vec<i64> = page.items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_offline_store_reports_unavailable() {
        let store = MemoryStore::new();
        store.set_available(false);
        let err = store.users().find_by_id(1).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::Unavailable);
        assert!(err.is_retriable());

        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
        assert!(store.users().find_by_id(1).await.unwrap().is_none());
    }
}
