//! Shared harness for the HTTP integration tests
//!
//! Builds the production router (probes, API, identity middleware and the
//! server's layer stack) over an in-memory store the test keeps a handle to.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use forum_service::auth::TokenIssuer;
use forum_service::config::{Config, JwtConfig};
use forum_service::models::{NewArticle, NewUser, User, ROLE_ADMIN};
use forum_service::repository::{ArticleRepository, ForumStore, MemoryStore, UserRepository};
use forum_service::routes::build_router;
use forum_service::server::Server;
use forum_service::state::AppState;

pub const SECRET: &str = "integration-secret";

pub fn test_config() -> Config {
    Config {
        jwt: JwtConfig {
            secret: Some(SECRET.to_string()),
            issuer: Some("forum-tests".to_string()),
            ..JwtConfig::default()
        },
        ..Config::named("forum-tests")
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    issuer: TokenIssuer,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let issuer = TokenIssuer::new(&config.jwt).unwrap();

        let state = AppState::with_shared_store(config.clone(), Arc::clone(&store));
        let router = Server::new(config)
            .layered(build_router(state).unwrap())
            .unwrap();

        Self {
            router,
            store,
            issuer,
        }
    }

    pub fn token_for(&self, user_id: i64) -> String {
        self.issuer.issue_for(user_id).unwrap()
    }

    /// Seed a member straight into the store and mint a token for them
    pub async fn member(&self, name: &str) -> (User, String) {
        self.seed_user(NewUser {
            name: Some(name.to_string()),
            ..NewUser::default()
        })
        .await
    }

    pub async fn admin(&self, name: &str) -> (User, String) {
        self.seed_user(NewUser {
            name: Some(name.to_string()),
            role: Some(ROLE_ADMIN.to_string()),
            ..NewUser::default()
        })
        .await
    }

    pub async fn seed_user(&self, user: NewUser) -> (User, String) {
        let user = self.store.users().create(user).await.unwrap();
        let token = self.token_for(user.id);
        (user, token)
    }

    /// Seed `count` articles by `author_id` titled "Article 1".."Article N"
    pub async fn seed_articles(&self, author_id: i64, count: usize) {
        for i in 1..=count {
            self.store
                .articles()
                .create_with_tags(
                    author_id,
                    NewArticle {
                        title: Some(format!("Article {i}")),
                        ..NewArticle::default()
                    },
                )
                .await
                .unwrap();
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}

/// Ids of the entities in a list response, in order
pub fn ids(list: &Value) -> Vec<i64> {
    list["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
