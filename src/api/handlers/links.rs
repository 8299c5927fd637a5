//! Handlers for link management endpoints (create, list, show, update).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "target_url": "example.com/docs",
///   "title": "Docs",        // optional
///   "code": "docs"          // optional, generated when absent
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL or code is invalid.
/// Returns 409 Conflict if a custom code is already taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(payload.into()).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=20`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params.resolve();

    let page = state.link_service.list_links(page, page_size).await?;

    Ok(Json(LinkListResponse::from_page(page, |code| {
        state.link_service.short_url(code)
    })))
}

/// Returns a single link with its click count.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Partially updates a short link.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// # Request Body
///
/// ```json
/// {
///   "target_url": "https://new-destination.com",
///   "title": null   // clears the title
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 400 Bad Request if validation fails.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update_link(&code, payload.into()).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}
