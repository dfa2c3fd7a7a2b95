//! User endpoints
//!
//! Every user endpoint needs an identity. Listing and showing stop there;
//! writes also pass the user policy, and role or status changes need an
//! administrator.

use std::collections::HashMap;

use axum::extract::{Query, State};

use super::lookup::fetch;
use super::{
    ApiError, ApiOperation, ItemResponse, ListResponse, Payload, RecordId, StatusMarker,
};
use crate::auth::{authorize, Action, Actor};
use crate::listing::{self, profiles};
use crate::models::{NewUser, User, UserChanges};
use crate::repository::{ForumStore, QueryState, UserRepository};
use crate::state::AppState;

pub async fn index<S: ForumStore>(
    State(state): State<AppState<S>>,
    _actor: Actor,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ListResponse<User>, ApiError> {
    listing::list::<User, _>(
        state.store().users(),
        QueryState::all(),
        &params,
        &profiles::USERS,
    )
    .await
    .map_err(|e| ApiError::during(ApiOperation::List, e))
}

pub async fn show<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<User>,
    _actor: Actor,
) -> Result<ItemResponse<User>, ApiError> {
    let user = fetch(state.store().users(), id, ApiOperation::Get).await?;
    Ok(ItemResponse::new(user))
}

pub async fn create<S: ForumStore>(
    State(state): State<AppState<S>>,
    actor: Actor,
    Payload(user): Payload<NewUser>,
) -> Result<ItemResponse<User>, ApiError> {
    authorize(state.user_policy(), &actor, ApiOperation::Create, Action::Create)?;

    let user = state
        .store()
        .users()
        .create(user)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Create, e))?;

    tracing::info!(user_id = user.id, actor = actor.id, "user created");
    Ok(ItemResponse::new(user))
}

pub async fn update<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<User>,
    actor: Actor,
    Payload(changes): Payload<UserChanges>,
) -> Result<ItemResponse<User>, ApiError> {
    let users = state.store().users();
    let user = fetch(users, id, ApiOperation::Update).await?;
    authorize(
        state.user_policy(),
        &actor,
        ApiOperation::Update,
        Action::UpdateOrDestroy(&user),
    )?;
    if changes.alters_standing(&user) {
        authorize(
            state.user_policy(),
            &actor,
            ApiOperation::Update,
            Action::Moderate(&user),
        )?;
    }

    let user = users
        .update(id, changes)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Update, e))?;
    Ok(ItemResponse::new(user))
}

pub async fn destroy<S: ForumStore>(
    State(state): State<AppState<S>>,
    RecordId(id, _): RecordId<User>,
    actor: Actor,
) -> Result<StatusMarker, ApiError> {
    let users = state.store().users();
    let user = fetch(users, id, ApiOperation::Delete).await?;
    authorize(
        state.user_policy(),
        &actor,
        ApiOperation::Delete,
        Action::UpdateOrDestroy(&user),
    )?;

    let removed = users
        .delete(id)
        .await
        .map_err(|e| ApiError::during(ApiOperation::Delete, e))?;
    if removed {
        tracing::info!(user_id = id, actor = actor.id, "user deleted");
        Ok(StatusMarker::SUCCESS)
    } else {
        Ok(StatusMarker::FAILURE)
    }
}
