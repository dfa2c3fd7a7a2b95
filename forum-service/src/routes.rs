//! Route table
//!
//! | method        | path                          | handler                       |
//! |---------------|-------------------------------|-------------------------------|
//! | GET           | /articles                     | [`articles::index`]           |
//! | GET           | /articles/solutions           | [`articles::solutions`]       |
//! | GET           | /articles/{id}                | [`articles::show`]            |
//! | POST          | /articles                     | [`articles::create`]          |
//! | PUT, PATCH    | /articles/{id}                | [`articles::update`]          |
//! | DELETE        | /articles/{id}                | [`articles::destroy`]         |
//! | POST, DELETE  | /articles/{id}/like           | [`articles::like`], [`articles::unlike`] |
//! | GET, POST     | /articles/{id}/comments       | [`articles::comments`], [`articles::create_comment`] |
//! | GET, POST     | /users                        | [`users::index`], [`users::create`] |
//! | GET           | /users/{id}                   | [`users::show`]               |
//! | PUT, PATCH    | /users/{id}                   | [`users::update`]             |
//! | DELETE        | /users/{id}                   | [`users::destroy`]            |
//!
//! All of them live under [`API_PREFIX`]; `/health` and `/ready` sit at the
//! root.

use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::error::Result;
use crate::handlers::{articles, users, ApiError};
use crate::health::{health, readiness};
use crate::middleware::JwtAuth;
use crate::repository::ForumStore;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Resource routes, relative to [`API_PREFIX`]
pub fn api_routes<S: ForumStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/articles", get(articles::index::<S>).post(articles::create::<S>))
        .route("/articles/solutions", get(articles::solutions::<S>))
        .route(
            "/articles/{id}",
            get(articles::show::<S>)
                .put(articles::update::<S>)
                .patch(articles::update::<S>)
                .delete(articles::destroy::<S>),
        )
        .route(
            "/articles/{id}/like",
            post(articles::like::<S>).delete(articles::unlike::<S>),
        )
        .route(
            "/articles/{id}/comments",
            get(articles::comments::<S>).post(articles::create_comment::<S>),
        )
        .route("/users", get(users::index::<S>).post(users::create::<S>))
        .route(
            "/users/{id}",
            get(users::show::<S>)
                .put(users::update::<S>)
                .patch(users::update::<S>)
                .delete(users::destroy::<S>),
        )
}

/// The complete application: probes, API and identity middleware
///
/// Fails when the JWT settings cannot produce a validator.
pub fn build_router<S: ForumStore>(state: AppState<S>) -> Result<Router> {
    let auth = JwtAuth::new(&state.config().jwt)?;

    let router = Router::new()
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
        .nest(API_PREFIX, api_routes::<S>())
        .fallback(unknown_route)
        .layer(from_fn_with_state(auth, JwtAuth::middleware))
        .with_state(state);

    Ok(router)
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::not_found("Route", uri.path())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, JwtConfig};
    use crate::repository::MemoryStore;

    fn config() -> Config {
        Config {
            jwt: JwtConfig {
                secret: Some("routes-secret".to_string()),
                ..JwtConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_router_needs_jwt_key() {
        let state = AppState::new(Config::default(), MemoryStore::new());
        assert!(build_router(state).is_err());
    }

    #[tokio::test]
    async fn test_probes_and_unknown_routes() {
        let app = build_router(AppState::new(config(), MemoryStore::new())).unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/v1/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_token_is_anonymous() {
        let app = build_router(AppState::new(config(), MemoryStore::new())).unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/articles")
                    .header("authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/v1/users")
                    .header("authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
