//! HTTP tests for the article endpoints

mod common;

use axum::http::{Method, StatusCode};
use common::{ids, TestApp};
use serde_json::json;

#[tokio::test]
async fn second_page_sorted_descending() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 25).await;

    let (status, body) = app
        .get("/api/v1/articles?page=2&per=10&sort_field=id&sort_order=descend", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), (6..=15).rev().collect::<Vec<i64>>());
    assert_eq!(
        body["meta"],
        json!({ "total": 25, "page": 2, "per_page": 10, "page_count": 3 })
    );
}

#[tokio::test]
async fn invalid_list_params_fall_back_to_defaults() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 12).await;

    let (status, body) = app
        .get(
            "/api/v1/articles?page=zero&per=500&sort_field=password&sort_order=sideways",
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), (1..=10).collect::<Vec<i64>>());
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["per_page"], 10);
}

#[tokio::test]
async fn page_past_the_end_is_empty_with_metadata() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 5).await;

    let (status, body) = app.get("/api/v1/articles?page=9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["page_count"], 1);
}

#[tokio::test]
async fn search_and_tag_filter_compose() {
    let app = TestApp::new();
    let (_, token) = app.member("writer").await;

    for (title, tags) in [
        ("Borrow checker basics", vec!["rust"]),
        ("Borrow money wisely", vec!["finance"]),
        ("Async rust", vec!["rust", "async"]),
    ] {
        let (status, _) = app
            .post(
                "/api/v1/articles",
                Some(&token),
                json!({ "title": title, "tags": tags }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.get("/api/v1/articles?search=borrow&tag=rust", None).await;
    assert_eq!(ids(&body), vec![1]);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn solutions_only_lists_solution_articles() {
    let app = TestApp::new();
    let (_, token) = app.member("writer").await;
    for article_type in ["article", "solution", "solution"] {
        app.post(
            "/api/v1/articles",
            Some(&token),
            json!({ "title": "t", "article_type": article_type }),
        )
        .await;
    }

    let (status, body) = app.get("/api/v1/articles/solutions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2, 3]);
}

#[tokio::test]
async fn create_requires_identity() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/v1/articles", None, json!({ "title": "anonymous" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], 1);
}

#[tokio::test]
async fn create_assigns_author_and_normalizes_tags() {
    let app = TestApp::new();
    let (author, token) = app.member("writer").await;

    let (status, body) = app
        .post(
            "/api/v1/articles",
            Some(&token),
            json!({
                "title": "Tagged",
                "tags": [" rust ", "rust", "", "web"],
                "user_id": 999
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], author.id);
    assert_eq!(body["data"]["tags"], json!(["rust", "web"]));
    assert_eq!(body["data"]["status"], "published");
}

#[tokio::test]
async fn invalid_create_leaves_no_trace() {
    let app = TestApp::new();
    let (_, token) = app.member("writer").await;
    let before = app.store.stats().await;

    let (status, body) = app
        .post(
            "/api/v1/articles",
            Some(&token),
            json!({ "title": "   ", "tags": ["orphan"] }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], 1);
    let after = app.store.stats().await;
    assert_eq!(after.articles, before.articles);
    assert_eq!(after.tags, before.tags);
    assert_eq!(after.taggings, before.taggings);
}

#[tokio::test]
async fn malformed_body_is_mutation_failure() {
    let app = TestApp::new();
    let (_, token) = app.member("writer").await;
    let (status, body) = app
        .post("/api/v1/articles", Some(&token), json!(["not", "an", "object"]))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], 1);
}

#[tokio::test]
async fn only_author_or_admin_may_update() {
    let app = TestApp::new();
    let (author, author_token) = app.member("writer").await;
    let (_, other_token) = app.member("stranger").await;
    let (_, admin_token) = app.admin("moderator").await;
    app.seed_articles(author.id, 1).await;

    let change = json!({ "title": "Hijacked" });
    let (status, body) = app
        .send(Method::PUT, "/api/v1/articles/1", Some(&other_token), Some(change))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], 1);

    let (_, body) = app.get("/api/v1/articles/1", None).await;
    assert_eq!(body["data"]["title"], "Article 1");

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/articles/1",
            Some(&author_token),
            Some(json!({ "title": "Edited", "tags": ["news"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Edited");
    assert_eq!(body["data"]["tags"], json!(["news"]));

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/articles/1",
            Some(&admin_token),
            Some(json!({ "status": "draft" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_article_is_404_before_authorization() {
    let app = TestApp::new();
    let (_, token) = app.member("stranger").await;

    let (status, body) = app
        .send(Method::DELETE, "/api/v1/articles/77", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["entity_id"], "77");

    let (status, _) = app.get("/api/v1/articles/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn destroy_cascades_and_returns_status_marker() {
    let app = TestApp::new();
    let (author, token) = app.member("writer").await;
    let (_, reader_token) = app.member("reader").await;
    app.seed_articles(author.id, 1).await;

    app.post("/api/v1/articles/1/like", Some(&reader_token), json!({}))
        .await;
    app.post(
        "/api/v1/articles/1/comments",
        Some(&reader_token),
        json!({ "description": "first" }),
    )
    .await;

    let (status, body) = app
        .send(Method::DELETE, "/api/v1/articles/1", Some(&reader_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], 1);

    let (status, body) = app
        .send(Method::DELETE, "/api/v1/articles/1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error_code": 0 }));

    let stats = app.store.stats().await;
    assert_eq!(stats.articles, 0);
    assert_eq!(stats.comments, 0);
    assert_eq!(stats.likes, 0);
    assert_eq!(stats.taggings, 0);
}

#[tokio::test]
async fn like_and_unlike_are_idempotent() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    let (_, token) = app.member("fan").await;
    app.seed_articles(author.id, 1).await;

    let (status, first) = app.post("/api/v1/articles/1/like", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["article"]["likes_count"], 1);
    assert_eq!(first["data"]["changed"], true);

    let (_, second) = app.post("/api/v1/articles/1/like", Some(&token), json!({})).await;
    assert_eq!(second["data"]["article"]["likes_count"], 1);
    assert_eq!(second["data"]["changed"], false);
    assert_eq!(second["data"]["liked"], true);

    let (status, removed) = app
        .send(Method::DELETE, "/api/v1/articles/1/like", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["data"]["article"]["likes_count"], 0);
    assert_eq!(removed["data"]["liked"], false);

    let (_, again) = app
        .send(Method::DELETE, "/api/v1/articles/1/like", Some(&token), None)
        .await;
    assert_eq!(again["data"]["article"]["likes_count"], 0);
    assert_eq!(again["data"]["changed"], false);
}

#[tokio::test]
async fn like_missing_article_is_404() {
    let app = TestApp::new();
    let (_, token) = app.member("fan").await;
    let (status, _) = app.post("/api/v1/articles/5/like", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn offline_store_is_unavailable_for_reads_and_readiness() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 1).await;
    app.store.set_available(false);

    let (status, body) = app.get("/api/v1/articles", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_code"], 1);
    assert_eq!(body["operation"], "list");

    let (status, _) = app.get("/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);

    app.store.set_available(true);
    let (status, body) = app.get("/api/v1/articles/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Article 1");
}

#[tokio::test]
async fn non_numeric_article_id_is_404() {
    let app = TestApp::new();
    let (author, token) = app.member("writer").await;
    app.seed_articles(author.id, 1).await;

    let (status, body) = app.get("/api/v1/articles/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], 1);
    assert_eq!(body["entity_type"], "Article");
    assert_eq!(body["entity_id"], "abc");

    let (status, body) = app
        .send(Method::DELETE, "/api/v1/articles/1x", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["operation"], "delete");
    assert_eq!(app.store.stats().await.articles, 1);

    let (status, _) = app.get("/api/v1/articles/abc/comments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn date_only_range_includes_the_whole_day() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 3).await;

    let today = chrono::Utc::now().date_naive();
    let (status, body) = app
        .get(
            &format!("/api/v1/articles?created_from={today}&created_to={today}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);

    let yesterday = today.pred_opt().unwrap();
    let (_, body) = app
        .get(&format!("/api/v1/articles?created_to={yesterday}"), None)
        .await;
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn invalid_token_reads_anonymously_but_cannot_write() {
    let app = TestApp::new();
    let (author, _) = app.member("writer").await;
    app.seed_articles(author.id, 2).await;

    let (status, body) = app.get("/api/v1/articles", Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2]);

    let (status, _) = app.get("/api/v1/articles/1", Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/v1/articles", Some("garbage"), json!({ "title": "Sneaky" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], 1);
    assert_eq!(app.store.stats().await.articles, 2);
}
