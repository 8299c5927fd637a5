mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use short_url::domain::repositories::LinkRepository;
use short_url::infrastructure::persistence::InMemoryLinkRepository;
use short_url::routes::router;
use std::sync::Arc;

fn server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let (state, repo, _rx) = common::create_test_state();
    (TestServer::new(router(state)).unwrap(), repo)
}

#[tokio::test]
async fn test_create_link_with_generated_code() {
    let (server, _repo) = server();

    let response = server
        .post("/api/links")
        .json(&json!({ "target_url": "  Example.com/docs  ", "title": "Docs" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();

    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["target_url"], "https://Example.com/docs");
    assert_eq!(body["title"], "Docs");
    assert_eq!(body["click_count"], 0);
    assert_eq!(body["short_url"], format!("{}/s/{code}", common::BASE_URL));
}

#[tokio::test]
async fn test_created_link_redirects() {
    let (server, _repo) = server();

    let body: Value = server
        .post("/api/links")
        .json(&json!({ "target_url": "example.com" }))
        .await
        .json();
    let code = body["code"].as_str().unwrap();

    let response = server.get(&format!("/go/{code}")).await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_create_link_rejects_invalid_urls() {
    let (server, repo) = server();

    let cases = [
        ("", "empty"),
        ("example.com/a\nb", "control-character"),
        ("ftp://example.com", "scheme"),
        ("https:///path", "no-host"),
        ("http://999.1.1.1", "bad-ipv4"),
        ("https://bad_host", "bad-hostname"),
    ];

    for (url, reason) in cases {
        let response = server
            .post("/api/links")
            .json(&json!({ "target_url": url }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "validation_error", "url: {url}");
        assert_eq!(body["error"]["details"]["reason"], reason, "url: {url}");
    }

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_link_accepts_localhost_and_ipv4() {
    let (server, _repo) = server();

    for url in ["http://localhost:8080/", "http://192.168.0.1/admin"] {
        server
            .post("/api/links")
            .json(&json!({ "target_url": url }))
            .await
            .assert_status(StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_create_link_custom_code_conflict() {
    let (server, _repo) = server();

    server
        .post("/api/links")
        .json(&json!({ "target_url": "https://a.com", "code": "launch" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/links")
        .json(&json!({ "target_url": "https://b.com", "code": "launch" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");

    let kept: Value = server.get("/api/links/launch").await.json();
    assert_eq!(kept["target_url"], "https://a.com");
}

#[tokio::test]
async fn test_create_link_invalid_custom_code() {
    let (server, _repo) = server();

    let response = server
        .post("/api/links")
        .json(&json!({ "target_url": "https://a.com", "code": "no spaces" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_link_not_found() {
    let (server, _repo) = server();

    let response = server.get("/api/links/missing").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_update_link_target_and_title() {
    let (server, repo) = server();
    common::create_test_link(&repo, "edit", "https://old.com").await;

    let response = server
        .patch("/api/links/edit")
        .json(&json!({ "target_url": "new.com/path", "title": "New" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["target_url"], "https://new.com/path");
    assert_eq!(body["title"], "New");

    let response = server
        .patch("/api/links/edit")
        .json(&json!({ "title": null }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["title"].is_null());
    assert_eq!(body["target_url"], "https://new.com/path");

    let redirect = server.get("/s/edit").await;
    assert_eq!(redirect.header("location"), "https://new.com/path");
}

#[tokio::test]
async fn test_update_link_invalid_url_keeps_old_target() {
    let (server, repo) = server();
    common::create_test_link(&repo, "keep", "https://old.com").await;

    let response = server
        .patch("/api/links/keep")
        .json(&json!({ "target_url": "https://bad_host" }))
        .await;

    response.assert_status_bad_request();

    let body: Value = server.get("/api/links/keep").await.json();
    assert_eq!(body["target_url"], "https://old.com");
}

#[tokio::test]
async fn test_update_missing_link() {
    let (server, _repo) = server();

    let response = server
        .patch("/api/links/missing")
        .json(&json!({ "title": "x" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_list_links_paginated() {
    let (server, repo) = server();
    for i in 0..5 {
        common::create_test_link(&repo, &format!("code{i}"), "https://example.com").await;
    }

    let response = server
        .get("/api/links")
        .add_query_param("page", 1)
        .add_query_param("page_size", 2)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["code"], "code4");
}

#[tokio::test]
async fn test_list_links_invalid_page() {
    let (server, _repo) = server();

    let response = server.get("/api/links").add_query_param("page", 0).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_list_links_page_out_of_range() {
    let (server, repo) = server();
    common::create_test_link(&repo, "abc123", "https://example.com").await;

    let response = server
        .get("/api/links")
        .add_query_param("page", i64::MAX)
        .add_query_param("page_size", 100)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_check_url_warns_without_failing() {
    let (server, _repo) = server();

    let response = server
        .post("/api/check")
        .json(&json!({ "url": "intranet" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["normalized_url"], "https://intranet");
    assert_eq!(body["warning"]["title"], "Suspicious URL format");
    assert!(
        body["warning"]["message"]
            .as_str()
            .unwrap()
            .contains("\"intranet\"")
    );
}

#[tokio::test]
async fn test_check_url_valid_has_no_warning() {
    let (server, _repo) = server();

    let body: Value = server
        .post("/api/check")
        .json(&json!({ "url": "example.com" }))
        .await
        .json();

    assert_eq!(body["normalized_url"], "https://example.com");
    assert!(body.get("warning").is_none());
}
