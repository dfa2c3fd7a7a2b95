//! Per-resource authorization policies
//!
//! A policy answers one question: may this actor perform this action on this
//! resource? Policies are plain values injected into
//! [`AppState`](crate::state::AppState), one per resource, so tests and
//! deployments can swap them.

use super::Actor;
use crate::handlers::{ApiError, ApiOperation};
use crate::models::{Article, User};

/// The action being authorized
#[derive(Debug)]
pub enum Action<'a, E> {
    /// Creating a new entity
    Create,
    /// Changing or removing an existing entity
    UpdateOrDestroy(&'a E),
    /// Changing an existing entity's role or status
    Moderate(&'a E),
}

// Only a reference is held, so copying must not require `E: Copy`.
impl<E> Clone for Action<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Action<'_, E> {}

/// Outcome of a policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied, with the reason shown to the client
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

pub trait Policy<E>: Send + Sync {
    fn authorize(&self, actor: &Actor, action: Action<'_, E>) -> Decision;
}

/// Articles: active members write, authors and admins change
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticlePolicy;

impl Policy<Article> for ArticlePolicy {
    fn authorize(&self, actor: &Actor, action: Action<'_, Article>) -> Decision {
        match action {
            Action::Create if actor.is_active() => Decision::Allow,
            Action::Create => Decision::Deny("Inactive accounts may not publish articles"),
            Action::UpdateOrDestroy(article)
                if article.user_id == actor.id || actor.is_admin() =>
            {
                Decision::Allow
            }
            Action::UpdateOrDestroy(_) => {
                Decision::Deny("Only the author may change this article")
            }
            Action::Moderate(_) if actor.is_admin() => Decision::Allow,
            Action::Moderate(_) => Decision::Deny("Only administrators may moderate articles"),
        }
    }
}

/// Users: anyone identified may create, only self or admins change, only
/// admins alter role or status
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPolicy;

impl Policy<User> for UserPolicy {
    fn authorize(&self, actor: &Actor, action: Action<'_, User>) -> Decision {
        match action {
            Action::Create => Decision::Allow,
            Action::UpdateOrDestroy(user) if user.id == actor.id || actor.is_admin() => {
                Decision::Allow
            }
            Action::UpdateOrDestroy(_) => Decision::Deny("Only the account owner may change it"),
            Action::Moderate(_) if actor.is_admin() => Decision::Allow,
            Action::Moderate(_) => {
                Decision::Deny("Only administrators may change role or status")
            }
        }
    }
}

/// Run a policy check, turning a denial into a `403`
pub fn authorize<E>(
    policy: &dyn Policy<E>,
    actor: &Actor,
    operation: ApiOperation,
    action: Action<'_, E>,
) -> Result<(), ApiError> {
    match policy.authorize(actor, action) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::info!(actor = actor.id, %operation, reason, "authorization denied");
            Err(ApiError::forbidden(operation, reason))
        }
    }
}
