//! # Map API
//!
//! Choropleth figures in Plotly JSON form, plus the home-page update that
//! the accordion calls on load and on every toggle click.
//!
//! The server keeps no per-client state. A page sends the index it last
//! showed (`active`) and, on a click, the control id that fired
//! (`trigger`); the response carries the new index for the page to keep.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ubo_core::{Figure, PanelState, PanelView, RenderError, ToggleEvent};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_path};
use crate::middleware::metrics::{record_render, record_render_failure};
use crate::state::AppState;

/// Body of a home-page update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HomeUpdateRequest {
    /// Id of the toggle control that was clicked, e.g. `group-3-toggle`.
    /// Absent on page load.
    #[serde(default)]
    pub trigger: Option<String>,
    /// Index the page showed before this event, if any. Only consulted
    /// when `trigger` is absent.
    #[serde(default)]
    pub active: Option<usize>,
}

/// Panel flags plus the figure to draw.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HomeUpdateResponse {
    /// The open category, or null while the placeholder is shown.
    pub active: Option<usize>,
    /// One flag per category, true only at `active`.
    pub open: Vec<bool>,
    /// Plotly figure (`data` plus `layout`).
    #[schema(value_type = Object)]
    pub figure: Figure,
}

impl From<PanelView> for HomeUpdateResponse {
    fn from(view: PanelView) -> Self {
        Self {
            active: view.active.map(|index| index.get()),
            open: view.open,
            figure: view.figure,
        }
    }
}

/// Build the map router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/map/placeholder", get(placeholder_map))
        .route("/v1/map/{index}", get(category_map))
        .route("/v1/home/update", post(update_home))
}

fn observe<T>(result: Result<T, RenderError>, title: Option<&str>) -> Result<T, RenderError> {
    match (&result, title) {
        (Ok(_), Some(title)) => record_render(title),
        (Err(err), _) if err.is_data_integrity() => record_render_failure(),
        _ => {}
    }
    result
}

/// GET /v1/map/placeholder — the introductory map shown before any click.
#[utoipa::path(
    get,
    path = "/v1/map/placeholder",
    responses(
        (status = 200, description = "Placeholder figure: outlines plus an instruction annotation"),
    ),
    tag = "map"
)]
pub async fn placeholder_map(State(state): State<AppState>) -> Json<Figure> {
    Json(state.atlas.placeholder())
}

/// GET /v1/map/{index} — the choropleth for one category.
#[utoipa::path(
    get,
    path = "/v1/map/{index}",
    params(
        ("index" = usize, Path, description = "Category position, starting at 0")
    ),
    responses(
        (status = 200, description = "Choropleth figure for the category"),
        (status = 404, description = "No category at this index", body = crate::error::ErrorBody),
        (status = 500, description = "The category's data holds an unmapped value", body = crate::error::ErrorBody),
    ),
    tag = "map"
)]
pub async fn category_map(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<Figure>, AppError> {
    let index = extract_path(index)?;
    let title = state
        .atlas
        .registry()
        .categories()
        .get(index)
        .map(|c| c.title.as_str());
    let figure = observe(state.atlas.render(index), title).map_err(AppError::for_path)?;
    Ok(Json(figure))
}

/// POST /v1/home/update — apply a page load or toggle click.
#[utoipa::path(
    post,
    path = "/v1/home/update",
    request_body = HomeUpdateRequest,
    responses(
        (status = 200, description = "New panel state and figure", body = HomeUpdateResponse),
        (status = 400, description = "Malformed body or trigger", body = crate::error::ErrorBody),
        (status = 422, description = "Index outside the registry", body = crate::error::ErrorBody),
        (status = 500, description = "The category's data holds an unmapped value", body = crate::error::ErrorBody),
    ),
    tag = "map"
)]
pub async fn update_home(
    State(state): State<AppState>,
    body: Result<Json<HomeUpdateRequest>, JsonRejection>,
) -> Result<Json<HomeUpdateResponse>, AppError> {
    let req = extract_json(body)?;
    let registry = state.atlas.registry();

    // A click moves to the clicked panel whatever was open before, so the
    // previous index only matters when there is no click to apply.
    let panel = match &req.trigger {
        Some(trigger) => {
            let event: ToggleEvent = trigger.parse()?;
            PanelState::initial(state.config.default_selection).toggle(event, registry)?
        }
        None => PanelState::resume(req.active, state.config.default_selection, registry)?,
    };

    let title = panel
        .active()
        .and_then(|index| registry.get(index).ok())
        .map(|c| c.title.as_str());
    let view = observe(state.atlas.view(panel), title)?;
    Ok(Json(view.into()))
}
