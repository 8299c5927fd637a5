//! API route configuration.

use crate::api::handlers::{
    check_url_handler, create_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST  /links`         - Create a short link
/// - `GET   /links`         - List links (paginated, newest first)
/// - `GET   /links/{code}`  - Show a link and its click count
/// - `PATCH /links/{code}`  - Change target URL and/or title
/// - `POST  /check`         - Advisory URL check
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{code}",
            get(get_link_handler).patch(update_link_handler),
        )
        .route("/check", post(check_url_handler))
}
