//! Application state management

use std::sync::Arc;

use crate::auth::{ArticlePolicy, Policy, UserPolicy};
use crate::config::Config;
use crate::models::{Article, User};
use crate::repository::ForumStore;

/// Application state shared across handlers
///
/// Generic over the backing store so the router can be built against the
/// in-memory store or any other [`ForumStore`].
pub struct AppState<S: ForumStore> {
    config: Arc<Config>,
    store: Arc<S>,
    article_policy: Arc<dyn Policy<Article>>,
    user_policy: Arc<dyn Policy<User>>,
}

// Derived Clone would require `S: Clone`
impl<S: ForumStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
            article_policy: Arc::clone(&self.article_policy),
            user_policy: Arc::clone(&self.user_policy),
        }
    }
}

impl<S: ForumStore> AppState<S> {
    /// State with the default policies
    pub fn new(config: Config, store: S) -> Self {
        Self::with_shared_store(config, Arc::new(store))
    }

    /// State over a store the caller keeps a handle to
    pub fn with_shared_store(config: Config, store: Arc<S>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            article_policy: Arc::new(ArticlePolicy),
            user_policy: Arc::new(UserPolicy),
        }
    }

    #[must_use]
    pub fn with_article_policy(mut self, policy: impl Policy<Article> + 'static) -> Self {
        self.article_policy = Arc::new(policy);
        self
    }

    #[must_use]
    pub fn with_user_policy(mut self, policy: impl Policy<User> + 'static) -> Self {
        self.user_policy = Arc::new(policy);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn article_policy(&self) -> &dyn Policy<Article> {
        self.article_policy.as_ref()
    }

    pub fn user_policy(&self) -> &dyn Policy<User> {
        self.user_policy.as_ref()
    }
}
