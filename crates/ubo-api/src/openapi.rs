//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented JSON routes into one OpenAPI document
//! served at `/openapi.json`. HTML pages, static downloads, health probes
//! and `/metrics` are not part of it.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the JSON API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "UBO Atlas API",
        description = "Choropleth figures for EU beneficial-ownership register categories.\n\nThe home page drives the accordion through `POST /v1/home/update`; the other endpoints expose the category registry and per-category figures directly.",
        license(name = "AGPL-3.0-or-later"),
        contact(name = "Open State Foundation", url = "https://openstate.eu")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::categories::list_categories,
        crate::routes::categories::get_category,
        crate::routes::map::placeholder_map,
        crate::routes::map::category_map,
        crate::routes::map::update_home,
    ),
    components(schemas(
        crate::routes::categories::CategorySummary,
        crate::routes::categories::LegendItem,
        crate::routes::map::HomeUpdateRequest,
        crate::routes::map::HomeUpdateResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "categories", description = "Category registry and legends"),
        (name = "map", description = "Choropleth figures and panel updates"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
