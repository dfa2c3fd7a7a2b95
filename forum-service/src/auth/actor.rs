//! The authenticated member behind a request

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::handlers::{ApiError, ApiOperation};
use crate::middleware::Claims;
use crate::models::{CommentAuthor, User, ROLE_ADMIN, STATUS_ACTIVE};
use crate::repository::{ForumStore, Repository};
use crate::state::AppState;

/// Identity of the member performing an action
///
/// Resolved from the bearer token's subject through the user store, so role
/// and status always reflect the current account, not the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub display_name: String,
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// Display identity to snapshot onto a comment
    pub fn as_comment_author(&self) -> CommentAuthor {
        CommentAuthor {
            id: self.id,
            name: self.display_name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name().to_string(),
            avatar: user.avatar.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
        }
    }
}

impl<S: ForumStore> FromRequestParts<AppState<S>> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| ApiError::unauthorized("Token subject is not a member"))?;

        let user = state
            .store()
            .users()
            .find_by_id(user_id)
            .await
            .map_err(|e| ApiError::during(ApiOperation::Get, e))?
            .ok_or_else(|| {
                tracing::warn!(user_id, "token subject has no account");
                ApiError::unauthorized("Unknown member")
            })?;

        Ok(Actor::from(&user))
    }
}
