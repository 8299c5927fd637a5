#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use short_url::application::services::LinkService;
use short_url::domain::click_event::ClickEvent;
use short_url::domain::click_worker::run_click_worker;
use short_url::domain::entities::{Link, LinkPatch, NewLink};
use short_url::domain::repositories::LinkRepository;
use short_url::error::AppError;
use short_url::infrastructure::persistence::InMemoryLinkRepository;
use short_url::state::AppState;
use short_url::utils::code_generator::CodeGenerator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_service(
    repository: Arc<dyn LinkRepository>,
) -> Arc<LinkService<dyn LinkRepository>> {
    Arc::new(LinkService::new(
        repository,
        CodeGenerator::with_seed(6, 42),
        BASE_URL,
    ))
}

/// State over an in-memory store. Click events stay in the returned receiver.
pub fn create_test_state() -> (
    AppState,
    Arc<InMemoryLinkRepository>,
    mpsc::Receiver<ClickEvent>,
) {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(create_test_service(repository.clone()), tx);

    (state, repository, rx)
}

/// State over an in-memory store with a running click worker.
pub fn create_test_state_with_worker(
    queue_capacity: usize,
) -> (AppState, Arc<InMemoryLinkRepository>, JoinHandle<()>) {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(queue_capacity);

    let worker = tokio::spawn(run_click_worker(rx, repository.clone(), 4));
    let state = AppState::new(create_test_service(repository.clone()), tx);

    (state, repository, worker)
}

/// Inserts a link as-is, bypassing URL validation.
pub async fn create_test_link(repository: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repository
        .create(NewLink {
            code: code.to_string(),
            target_url: url.to_string(),
            title: None,
        })
        .await
        .unwrap()
}

/// Repository whose every operation fails like an unreachable database.
pub struct FailingLinkRepository;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl LinkRepository for FailingLinkRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unavailable())
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn exists(&self, _code: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn update(&self, _code: &str, _patch: LinkPatch) -> Result<Link, AppError> {
        Err(unavailable())
    }

    async fn increment_click_count(&self, _code: &str) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn list(&self, _offset: i64, _limit: i64) -> Result<Vec<Link>, AppError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn create_failing_state() -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(create_test_service(Arc::new(FailingLinkRepository)), tx);

    (state, rx)
}
