//! Directory site API routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

/// Create API routes router.
///
/// Matching is on exact method and path; any other method on these paths is a 404.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/directory",
            get(handlers::directory::get_directory).fallback(handlers::not_found),
        )
        .route(
            "/api/listings",
            get(handlers::listings::list_listings).fallback(handlers::not_found),
        )
        .route(
            "/api/search",
            get(handlers::search::search_listings).fallback(handlers::not_found),
        )
        .route(
            "/api/directory-webhook",
            post(handlers::webhook::directory_webhook).fallback(handlers::not_found),
        )
}
