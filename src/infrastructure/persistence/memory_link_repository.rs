//! Process-local implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// In-memory link store keyed by short code.
///
/// Every mutation takes the write lock, so the uniqueness check on insert and
/// the click increment are atomic with respect to each other. Contents are
/// lost on restart.
///
/// # Use Cases
///
/// - Local development without PostgreSQL (`STORAGE_BACKEND=memory`)
/// - Handler and service tests
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<String, Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.write().await;

        match links.entry(new_link.code) {
            Entry::Occupied(entry) => Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": entry.key() }),
            )),
            Entry::Vacant(entry) => {
                let now = Utc::now();
                let link = Link::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    entry.key().clone(),
                    new_link.target_url,
                    new_link.title,
                    0,
                    now,
                    now,
                );

                Ok(entry.insert(link).clone())
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.read().await.contains_key(code))
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let mut links = self.links.write().await;
        let link = links.get_mut(code).ok_or_else(|| link_not_found(code))?;

        if let Some(target_url) = patch.target_url {
            link.target_url = target_url;
        }
        if let Some(title) = patch.title {
            link.title = title;
        }
        link.updated_at = Utc::now();

        Ok(link.clone())
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        let mut links = self.links.write().await;
        let link = links.get_mut(code).ok_or_else(|| link_not_found(code))?;

        link.click_count += 1;

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError> {
        let links = self.links.read().await;

        let mut all: Vec<&Link> = links.values().collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.read().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
