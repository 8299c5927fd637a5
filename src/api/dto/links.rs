//! DTOs for link creation and retrieval endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateLink, LinkPage};
use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
///
/// URL syntax and custom code rules are enforced by the service so that the
/// error carries a precise `reason`; only size limits are checked here.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL. A missing scheme defaults to `https://`.
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub target_url: String,

    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,

    /// Optional custom short code.
    pub code: Option<String>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(r: CreateLinkRequest) -> Self {
        Self {
            target_url: r.target_url,
            title: r.title,
            code: r.code,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub target_url: String,
    pub title: Option<String>,
    pub click_count: i64,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            target_url: link.target_url,
            title: link.title,
            click_count: link.click_count,
            short_url,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Paginated list of links, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub items: Vec<LinkResponse>,
}

impl LinkListResponse {
    /// Builds the response, deriving each short link with `short_url`.
    pub fn from_page(page: LinkPage, short_url: impl Fn(&str) -> String) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            items: page
                .items
                .into_iter()
                .map(|link| {
                    let url = short_url(&link.code);
                    LinkResponse::new(link, url)
                })
                .collect(),
        }
    }
}
