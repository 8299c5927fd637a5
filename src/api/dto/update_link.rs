//! DTO for the link update endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::UpdateLink;

/// Request body for `PATCH /api/links/{code}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `title` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear the title
/// - **String** → set new title
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New target URL, normalized and validated like on creation.
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub target_url: Option<String>,

    #[validate(length(max = 255, message = "Title is too long"))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,
}

impl From<UpdateLinkRequest> for UpdateLink {
    fn from(r: UpdateLinkRequest) -> Self {
        Self {
            target_url: r.target_url,
            title: r.title,
        }
    }
}
