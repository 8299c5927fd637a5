//! PostgreSQL repository tests.
//!
//! Need a reachable database via `DATABASE_URL`; run with
//! `cargo test --test repository_link -- --ignored`.

use sqlx::PgPool;
use std::sync::Arc;
use short_url::domain::entities::{LinkPatch, NewLink};
use short_url::domain::repositories::LinkRepository;
use short_url::error::AppError;
use short_url::infrastructure::persistence::PgLinkRepository;

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        target_url: url.to_string(),
        title: None,
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .create(NewLink {
            code: "test123".to_string(),
            target_url: "https://example.com".to_string(),
            title: Some("Example".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(link.code, "test123");
    assert_eq!(link.target_url, "https://example.com");
    assert_eq!(link.title.as_deref(), Some("Example"));
    assert_eq!(link.click_count, 0);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link("dup", "https://a.com")).await.unwrap();
    let result = repo.create(new_link("dup", "https://b.com")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_by_code_is_case_sensitive(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("AbC", "https://example.com")).await.unwrap();

    assert!(repo.find_by_code("AbC").await.unwrap().is_some());
    assert!(repo.find_by_code("abc").await.unwrap().is_none());
    assert!(repo.exists("AbC").await.unwrap());
    assert!(!repo.exists("abc").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_and_clear_title(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(NewLink {
        code: "upd".to_string(),
        target_url: "https://old.com".to_string(),
        title: Some("Old".to_string()),
    })
    .await
    .unwrap();

    let updated = repo
        .update(
            "upd",
            LinkPatch {
                target_url: Some("https://new.com".to_string()),
                title: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.target_url, "https://new.com");
    assert_eq!(updated.title.as_deref(), Some("Old"));

    let cleared = repo
        .update(
            "upd",
            LinkPatch {
                target_url: None,
                title: Some(None),
            },
        )
        .await
        .unwrap();
    assert!(cleared.title.is_none());
    assert_eq!(cleared.target_url, "https://new.com");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_missing_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.update("missing", LinkPatch::default()).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_increments(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    repo.create(new_link("hot", "https://example.com")).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        tasks.spawn(async move { repo.increment_click_count("hot").await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let link = repo.find_by_code("hot").await.unwrap().unwrap();
    assert_eq!(link.click_count, 50);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_increment_missing_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.increment_click_count("missing").await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_and_count(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    for i in 0..3 {
        repo.create(new_link(&format!("code{i}"), "https://example.com"))
            .await
            .unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 3);

    let first = repo.list(0, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].code, "code2");

    let second = repo.list(2, 2).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].code, "code0");

    repo.ping().await.unwrap();
}
