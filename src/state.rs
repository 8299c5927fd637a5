//! Shared state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Application state cloned into each request.
///
/// The service is type-erased over the repository so the same router serves
/// both the PostgreSQL and in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<dyn LinkRepository>>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_service,
            click_sender,
        }
    }
}
