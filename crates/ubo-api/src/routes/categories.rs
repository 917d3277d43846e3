//! # Category Registry API
//!
//! Read-only view of the categories in display order, each with its legend
//! and the id of the accordion control that opens it.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ubo_core::{CategoryDefinition, CategoryIndex, LegendEntry, ToggleEvent};

use crate::error::AppError;
use crate::extractors::extract_path;
use crate::state::AppState;

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegendItem {
    /// Raw textual value as it appears in the data.
    pub label: String,
    /// Ordinal code, 0 (not applicable) to 4 (worst).
    pub code: u8,
    /// Hex colour of the swatch.
    pub color: String,
}

impl From<LegendEntry> for LegendItem {
    fn from(entry: LegendEntry) -> Self {
        Self {
            label: entry.label,
            code: entry.code.code(),
            color: entry.color.to_string(),
        }
    }
}

/// A category as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    /// Position in the registry.
    pub index: usize,
    pub title: String,
    pub description: String,
    /// DOM id of the accordion toggle for this category.
    pub toggle_id: String,
    pub legend: Vec<LegendItem>,
}

impl CategorySummary {
    fn new(index: CategoryIndex, category: &CategoryDefinition) -> Self {
        Self {
            index: index.get(),
            title: category.title.clone(),
            description: category.description.clone(),
            toggle_id: ToggleEvent::control_id(index),
            legend: category.legend().into_iter().map(LegendItem::from).collect(),
        }
    }
}

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/categories", get(list_categories))
        .route("/v1/categories/{index}", get(get_category))
}

/// GET /v1/categories — every category in display order.
#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "Categories in display order", body = Vec<CategorySummary>),
    ),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    let categories = state
        .atlas
        .registry()
        .iter()
        .map(|(index, category)| CategorySummary::new(index, category))
        .collect();
    Json(categories)
}

/// GET /v1/categories/{index} — one category.
#[utoipa::path(
    get,
    path = "/v1/categories/{index}",
    params(
        ("index" = usize, Path, description = "Category position, starting at 0")
    ),
    responses(
        (status = 200, description = "The category", body = CategorySummary),
        (status = 404, description = "No category at this index", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<CategorySummary>, AppError> {
    let registry = state.atlas.registry();
    let index = registry
        .index(extract_path(index)?)
        .map_err(AppError::for_path)?;
    let category = registry.get(index).map_err(AppError::for_path)?;
    Ok(Json(CategorySummary::new(index, category)))
}
