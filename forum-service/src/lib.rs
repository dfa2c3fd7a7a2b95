//! # forum-service
//!
//! JSON API for a small community forum: articles with tags and likes,
//! threaded comments, and member accounts.
//!
//! ## Features
//!
//! - **Listing pipeline**: per-endpoint parameter schemas, search, filters,
//!   whitelisted sorting and bounded pagination
//! - **Atomic writes**: tags, likes, counters and cascades commit together
//! - **Identity**: bearer JWTs resolved to an [`Actor`](auth::Actor), with
//!   one authorization [`Policy`](auth::Policy) per resource
//! - **Middleware stack**: request ids, panic recovery, body limits, CORS,
//!   compression, timeouts and structured JSON logs
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use forum_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), MemoryStore::new());
//!     let app = build_router(state)?;
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::{Action, Actor, ArticlePolicy, Decision, Policy, TokenIssuer, UserPolicy};
    pub use crate::bootstrap::seed_admin;
    pub use crate::config::{BootstrapConfig, Config, JwtConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, ItemResponse, ListResponse, PageMeta, StatusMarker,
    };
    pub use crate::health::{health, readiness};
    pub use crate::listing::{list, paginate, ListingProfile, PageRequest};
    pub use crate::middleware::{Claims, JwtAuth};
    pub use crate::models::{
        Article, ArticleChanges, Comment, CommentDraft, NewArticle, NewUser, User, UserChanges,
    };
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::{
        ArticleRepository, CommentRepository, ForumStore, MemoryStore, QueryState, Repository,
        RepositoryError, RepositoryResult, UserRepository,
    };
    pub use crate::routes::{api_routes, build_router, API_PREFIX};
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, patch, post, put},
        Json, Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, instrument, warn};

    pub use tokio;
}
