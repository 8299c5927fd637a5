//! DTOs for the URL check endpoint.

use serde::{Deserialize, Serialize};

use crate::utils::url_normalizer::{UrlAdvice, UrlWarning};

/// Request body for `POST /api/check`.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub url: String,
}

/// Advisory result. `warning` is omitted when the URL looks fine.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub normalized_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<UrlWarning>,
}

impl From<UrlAdvice> for CheckResponse {
    fn from(advice: UrlAdvice) -> Self {
        Self {
            normalized_url: advice.normalized,
            warning: advice.warning,
        }
    }
}
