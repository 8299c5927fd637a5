//! Server-rendered HTML pages.
//!
//! Uses Askama templates from the `templates/` directory.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Page shown when a short code cannot be resolved.
///
/// Renders `templates/not_found.html`. Unknown codes and codes whose stored
/// target failed re-validation produce the same page.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub code: String,
}

/// Renders the not-found page with a 404 status.
pub fn not_found_page(code: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate { code: code.into() },
    )
        .into_response()
}
