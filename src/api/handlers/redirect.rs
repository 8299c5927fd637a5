//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::enqueue_click;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::not_found_page;

/// Redirects a short code to its target URL.
///
/// # Endpoints
///
/// `GET /s/{code}` and `GET /go/{code}` (same handler)
///
/// # Request Flow
///
/// 1. Look up the code (case-sensitive)
/// 2. Re-validate the stored target; an invalid target is treated as missing
/// 3. Queue a click event for the background worker
/// 4. Return 302 Found with `Location` set to the normalized target
///
/// # Click Tracking
///
/// The response never waits on the counter update. Clicks are handed to a
/// bounded channel and applied by [`crate::domain::click_worker`].
///
/// # Errors
///
/// Returns the HTML not-found page (404) for unknown or invalid links.
/// Returns 500 if the store cannot be reached.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Some(target) = state.link_service.resolve_redirect(&code).await? else {
        return Ok(not_found_page(code));
    };

    let location = match HeaderValue::from_str(&target) {
        Ok(value) => value,
        Err(_) => {
            warn!(code = %code, "Target URL cannot be sent as a Location header");
            return Ok(not_found_page(code));
        }
    };

    debug!(code = %code, target = %target, "Redirecting");
    enqueue_click(&state.click_sender, ClickEvent::new(code));

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
