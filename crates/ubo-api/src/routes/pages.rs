//! # Page Routes
//!
//! `/about` serves the informational page. `/` and every path no other
//! route claims serve the home page, so a mistyped link still lands on the
//! map rather than a 404.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use ubo_core::route::ABOUT_PATH;
use ubo_core::View;

use crate::pages;
use crate::state::AppState;

/// Build the page router. The catch-all is installed by [`crate::app`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page))
        .route(ABOUT_PATH, get(page))
}

/// GET any page path.
pub async fn page(State(state): State<AppState>, uri: Uri) -> Html<String> {
    let view = View::resolve(uri.path());
    tracing::debug!(path = uri.path(), ?view, "page requested");
    Html(pages::render(view, state.atlas.registry()))
}
