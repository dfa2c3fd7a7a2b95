//! Article endpoints
//!
//! Reads are public. Writes need an [`Actor`] and pass the article policy
//! before touching the store; likes only need an actor.

use std::collections::HashMap;

use axum::extract::{Query, State};
use serde::Serialize;

use super::lookup::fetch;
use super::{
    ApiError, ApiOperation, ItemResponse, ListResponse, Payload, RecordId, StatusMarker,
};
use crate::auth::{authorize, Action, Actor};
use crate::listing::{self, profiles};
use crate::models::{Article, ArticleChanges, Comment, CommentDraft, NewArticle, NewComment};
use crate::repository::{
    ArticleRepository, CommentRepository, ForumStore, LikeOutcome, QueryState,
};
use crate::state::AppState;

type Params = Query<HashMap<String, String>>;

/// Article state after a like or unlike
#[derive(Debug, Clone, Serialize)]
pub struct LikeView {
    pub article: Article,
    /// Whether the actor now likes the article
    pub liked: bool,
    /// `false` when the like already was in the requested state
    pub changed: bool,
}

impl LikeView {
    fn new(outcome: LikeOutcome, liked: bool) -> Self {
        Self {
            article: outcome.article,
            liked,
            changed: outcome.changed,
        }
    }
}

pub async fn index<S: ForumStore>(
    State(state): State<AppState<S>>,
    Query(params): Params,
) -> Result<ListResponse<Article>, ApiError> {
    listing::list::<Article, _>(
        state.store().articles(),
        QueryState::all(),
        &params,
        &profiles::ARTICLES,
    )
    .await
    .map_err(|e| ApiError::during(ApiOperation::List, e))
}

/// Articles of type `solution`
pub async fn solutions<S: ForumStore>(
    State(state): State<AppState<S>>,
    Query(params): Params,
) -> Result<ListResponse<Article>, ApiError> {
    listing::list::<Article, _>(
        state.store().articles(),
        profiles::solutions_scope(),
        &params,
        &profiles::SOLUTIONS,
    )
    .await
    .map_err(|e| ApiError::during(ApiOperation::List, e))
}

pub async fn show<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
) -> Result<ItemResponse<Article>, ApiError> {
    let article = fetch(state.store().articles(), id, ApiOperation::Get).await?;
    Ok(ItemResponse::new(article))
}

pub async fn create<S: ForumStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Payload(article): Payload<NewArticle>,
) -> Result<ItemResponse<Article>, ApiError> {
    authorize(
        state.article_policy(),
        &actor,
        ApiOperation::Create,
        Action::Create,
    )?;

    let article = state
        .store()
        .articles()
        .create_with_tags(actor.id, article)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Create, e))?;

    tracing::info!(article_id = article.id, author = actor.id, "article created");
    Ok(ItemResponse::new(article))
}

pub async fn update<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    actor: Actor,
    Payload(changes): Payload<ArticleChanges>,
) -> Result<ItemResponse<Article>, ApiError> {
    let articles = state.store().articles();
    let article = fetch(articles, id, ApiOperation::Update).await?;
    authorize(
        state.article_policy(),
        &actor,
        ApiOperation::Update,
        Action::UpdateOrDestroy(&article),
    )?;

    let article = articles
        .update_with_tags(id, changes)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Update, e))?;
    Ok(ItemResponse::new(article))
}

pub async fn destroy<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    actor: Actor,
) -> Result<StatusMarker, ApiError> {
    let articles = state.store().articles();
    let article = fetch(articles, id, ApiOperation::Delete).await?;
    authorize(
        state.article_policy(),
        &actor,
        ApiOperation::Delete,
        Action::UpdateOrDestroy(&article),
    )?;

    let removed = articles
        .delete(id)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Delete, e))?;
    if removed {
        tracing::info!(article_id = id, actor = actor.id, "article deleted");
        Ok(StatusMarker::SUCCESS)
    } else {
        tracing::warn!(article_id = id, "article vanished before delete");
        Ok(StatusMarker::FAILURE)
    }
}

pub async fn like<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    actor: Actor,
) -> Result<ItemResponse<LikeView>, ApiError> {
    let outcome = state
        .store()
        .articles()
        .like(id, actor.id)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Like, e))?;
    Ok(ItemResponse::new(LikeView::new(outcome, true)))
}

pub async fn unlike<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    actor: Actor,
) -> Result<ItemResponse<LikeView>, ApiError> {
    let outcome = state
        .store()
        .articles()
        .unlike(id, actor.id)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Unlike, e))?;
    Ok(ItemResponse::new(LikeView::new(outcome, false)))
}

/// Comments of one article, newest first by default
pub async fn comments<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    Query(params): Params,
) -> Result<ListResponse<Comment>, ApiError> {
    fetch::<Article, _>(state.store().articles(), id, ApiOperation::List).await?;

    listing::list::<Comment, _>(
        state.store().comments(),
        profiles::article_comments_scope(id),
        &params,
        &profiles::COMMENTS,
    )
    .await
    .map_err(|e| ApiError::during(ApiOperation::List, e))
}

/// Comment as the actor, snapshotting their current display identity
pub async fn create_comment<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<Article>,
    actor: Actor,
    Payload(draft): Payload<CommentDraft>,
) -> Result<ItemResponse<Comment>, ApiError> {
    fetch::<Article, _>(state.store().articles(), id, ApiOperation::Create).await?;

    let comment = NewComment::new(draft, actor.as_comment_author(), id);
    let comment = state
        .store()
        .comments()
        .create(comment)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Create, e))?;

    tracing::info!(comment_id = comment.id, article_id = id, author = actor.id, "comment created");
    Ok(ItemResponse::new(comment))
}
