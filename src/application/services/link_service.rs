//! Link creation, editing and redirect resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_normalizer::{UrlAdvice, advise, normalize_and_validate};

/// Largest page size accepted by [`LinkService::list_links`].
pub const MAX_PAGE_SIZE: i64 = 100;

/// Input for creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    /// Raw target URL as entered by the user.
    pub target_url: String,
    pub title: Option<String>,
    /// Administrator-chosen code; generated when absent.
    pub code: Option<String>,
}

/// Input for editing a link. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    /// Raw replacement target URL, re-validated before storage.
    pub target_url: Option<String>,
    /// `Some(None)` clears the title.
    pub title: Option<Option<String>>,
}

/// One page of links plus the overall total.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<Link>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Service for creating, editing and resolving short links.
///
/// Validation runs here, before any store mutation; repositories only persist
/// what they are given.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    generator: CodeGenerator,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is only used to build display short links.
    pub fn new(
        link_repository: Arc<L>,
        generator: CodeGenerator,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            generator,
            base_url: base_url.into(),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &Arc<L> {
        &self.link_repository
    }

    /// Creates a short link.
    ///
    /// # Code Assignment
    ///
    /// - If `code` is provided, it is validated and inserted as-is; a taken
    ///   code is reported as a conflict
    /// - Otherwise a random code is generated against the store. If a
    ///   concurrent insert claims it first, a new code is generated and the
    ///   insert retried, so the caller never sees that collision
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid.
    /// Returns [`AppError::Conflict`] if a custom code already exists.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn create_link(&self, request: CreateLink) -> Result<Link, AppError> {
        let target_url = normalize_and_validate(&request.target_url)?;

        if let Some(code) = request.code {
            validate_custom_code(&code)?;

            let link = self
                .link_repository
                .create(NewLink {
                    code,
                    target_url,
                    title: request.title,
                })
                .await?;

            info!(code = %link.code, "Short link created with custom code");
            return Ok(link);
        }

        let repository = self.link_repository.as_ref();

        loop {
            let code = self
                .generator
                .generate_unique(move |candidate| async move { repository.exists(&candidate).await })
                .await?;

            let new_link = NewLink {
                code,
                target_url: target_url.clone(),
                title: request.title.clone(),
            };

            match self.link_repository.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    debug!("Generated code claimed by a concurrent insert, regenerating");
                }
                Ok(link) => {
                    info!(code = %link.code, "Short link created");
                    return Ok(link);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Edits the target URL and/or title of a link.
    ///
    /// A new target URL goes through the same normalization and validation as
    /// on creation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the new URL is invalid.
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn update_link(&self, code: &str, request: UpdateLink) -> Result<Link, AppError> {
        let target_url = request
            .target_url
            .as_deref()
            .map(normalize_and_validate)
            .transpose()?;

        let patch = LinkPatch {
            target_url,
            title: request.title,
        };

        if patch.is_empty() {
            return self.get_link(code).await;
        }

        let link = self.link_repository.update(code, patch).await?;
        info!(code = %link.code, "Short link updated");

        Ok(link)
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Lists links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is below 1 or `page_size`
    /// is outside `1..=MAX_PAGE_SIZE`.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list_links(&self, page: i64, page_size: i64) -> Result<LinkPage, AppError> {
        if page < 1 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": page_size }),
            ));
        }

        let offset = (page - 1).checked_mul(page_size).ok_or_else(|| {
            AppError::bad_request("Page is out of range", json!({ "page": page }))
        })?;

        let total = self.link_repository.count().await?;
        let items = self.link_repository.list(offset, page_size).await?;

        Ok(LinkPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Resolves a short code to the URL a visitor should be sent to.
    ///
    /// The stored target is re-validated on every read. A target that no
    /// longer passes is treated exactly like a missing code, but is logged and
    /// counted so operators can spot corrupted records.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` - normalized target to redirect to
    /// - `Ok(None)` - unknown code or invalid stored target
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve_redirect(&self, code: &str) -> Result<Option<String>, AppError> {
        let Some(link) = self.link_repository.find_by_code(code).await? else {
            debug!(code = %code, "Short code not found");
            return Ok(None);
        };

        match normalize_and_validate(&link.target_url) {
            Ok(url) => Ok(Some(url)),
            Err(e) => {
                warn!(
                    code = %code,
                    reason = e.reason(),
                    "Stored target URL failed re-validation, serving not found"
                );
                metrics::counter!("shorturl_invalid_stored_targets_total").increment(1);
                Ok(None)
            }
        }
    }

    /// Non-blocking URL check for interactive input.
    pub fn check_url(&self, raw: &str) -> UrlAdvice {
        advise(raw)
    }

    /// Builds the display short link `{base_url}/s/{code}`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/s/{}", self.base_url.trim_end_matches('/'), code)
    }
}
