//! Link entity representing a short code to target URL mapping.

use chrono::{DateTime, Utc};

/// A short link record.
///
/// `target_url` holds the normalized URL exactly as it will be sent in the
/// `Location` header. `click_count` only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub title: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        title: Option<String>,
        click_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            title,
            click_count,
            created_at,
            updated_at,
        }
    }
}

/// Input data for inserting a new link.
///
/// `target_url` must already be normalized; repositories store it as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub title: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `title: Some(None)` clears the title; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub target_url: Option<String>,
    pub title: Option<Option<String>>,
}

impl LinkPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.target_url.is_none() && self.title.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            Some("Example".to_string()),
            0,
            now,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.title.as_deref(), Some("Example"));
        assert_eq!(link.click_count, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_empty_patch() {
        assert!(LinkPatch::default().is_empty());

        let clear_title = LinkPatch {
            target_url: None,
            title: Some(None),
        };
        assert!(!clear_title.is_empty());
    }
}
