//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for link records.
///
/// Codes are matched exactly, without case folding.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with a click count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns whether a link with this code exists.
    ///
    /// Used as the uniqueness oracle for code generation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Partially updates a link.
    ///
    /// Only fields present in [`LinkPatch`] are modified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    /// Returns [`AppError::Internal`] on store errors.
    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError>;

    /// Atomically adds one to the click counter.
    ///
    /// Concurrent calls for the same code must never lose an increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    /// Returns [`AppError::Internal`] on store errors.
    async fn increment_click_count(&self, code: &str) -> Result<(), AppError>;

    /// Lists links, newest first.
    ///
    /// # Arguments
    ///
    /// - `offset` - Number of links to skip
    /// - `limit` - Maximum number of links to return
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
