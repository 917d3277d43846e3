//! # ubo-core — UBO Atlas Core
//!
//! Everything the atlas computes, independent of how it is served.
//!
//! ## Components
//!
//! - **Category registry** ([`category`]): the ordered policy categories, each
//!   mapping raw textual values to an ordinal code.
//! - **Colour bucketing** ([`severity`]): ordinal code → display colour.
//! - **Dataset and boundaries** ([`dataset`], [`geo`]): CSV tables and the
//!   GeoJSON country polygons, loaded once.
//! - **Map renderer** ([`render`], [`figure`]): (category, dataset) → a
//!   Plotly-ready choropleth figure.
//! - **Panel state machine** ([`panel`]): the single open accordion panel.
//! - **Page routing** ([`route`]): path → view.
//!
//! ## Crate Policy
//!
//! - Rendering is pure: no caches, no interior mutability, no I/O.
//! - Loading is the only I/O, and it happens before anything is served.
//! - No `.unwrap()` outside tests. Data faults are errors that name the
//!   country, category and value involved.

pub mod atlas;
pub mod category;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod geo;
pub mod panel;
pub mod render;
pub mod route;
pub mod severity;

// Re-export primary types for ergonomic imports.
pub use atlas::{Atlas, AtlasSources};
pub use category::{CategoryDefinition, CategoryIndex, CategoryRegistry, LegendEntry, StatusEntry};
pub use dataset::{CountryRecord, DataSources, Dataset, TooltipRecord};
pub use error::{AtlasError, LoadError, RenderError};
pub use figure::{ColorScale, Figure};
pub use geo::GeoBoundary;
pub use panel::{DefaultSelection, PanelState, PanelView, ToggleEvent};
pub use render::{render_map, render_placeholder};
pub use route::View;
pub use severity::{color_for, Severity};
