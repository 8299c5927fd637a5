//! Handler for the advisory URL check.

use axum::{Json, extract::State};

use crate::api::dto::check::{CheckRequest, CheckResponse};
use crate::state::AppState;

/// Normalizes a URL and reports whether it looks suspicious.
///
/// # Endpoint
///
/// `POST /api/check`
///
/// Never fails: a URL that would be rejected on creation still gets a
/// normalized form and a warning, so a UI can ask the user to confirm.
///
/// # Response
///
/// ```json
/// {
///   "normalized_url": "https://intranet",
///   "warning": {
///     "title": "Suspicious URL format",
///     "message": "The hostname \"intranet\" does not look like a valid domain. Please include a full domain (e.g. example.com) or a valid IP."
///   }
/// }
/// ```
pub async fn check_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckRequest>,
) -> Json<CheckResponse> {
    Json(state.link_service.check_url(&payload.url).into())
}
