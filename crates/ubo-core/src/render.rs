//! # Map Renderer
//!
//! Turns (selected category, dataset) into a [`Figure`]. Rendering is a
//! pure function of its inputs: the same index over the same dataset
//! always yields an identical figure, and nothing is cached or mutated.
//!
//! For each country, in dataset order, the renderer looks up the raw value
//! for the selected category in that category's status map. The resulting
//! ordinal codes drive both the `z` array and a colour scale restricted to
//! the codes actually observed. A value outside the status map fails the
//! whole render with the offending country, category and value, unless the
//! category declares a fallback code.

use std::sync::Arc;

use crate::category::{CategoryDefinition, CategoryIndex, CategoryRegistry};
use crate::dataset::{CountryRecord, Dataset};
use crate::error::RenderError;
use crate::figure::{Annotation, ChoroplethTrace, ColorScale, Figure, Font, Layout};
use crate::geo::GeoBoundary;
use crate::severity::Severity;

/// Introductory text shown on the map before any category is chosen.
pub const PLACEHOLDER_TEXT: &str = concat!(
    "An Ultimate Beneficial Owner refers<br>",
    "to the person or persons who ultimately<br>",
    "own or control a legal entity or arrangement,<br>",
    "such as a company, a trust, or a foundation.<br>",
    "In the EU countries are required to set up<br>",
    "UBO-registers. These registers help to prevent<br>",
    "financial and economic crimes such as money<br>",
    "laundering, tax fraud and corruption. The <br>",
    "register makes it clear who are pulling the<br>",
    "strings. This way, people cannot hide any<br>",
    "potential financial crimes behind a corporation.<br>",
    "This website details how these UBO registers<br>",
    "are set-up around the EU.<br><br>",
    "<b>Click on one of the categories to see the<br>",
    "results on the map.</b>",
);

/// Annotation colour.
pub const PLACEHOLDER_COLOR: &str = "#002346";
/// Annotation font size.
pub const PLACEHOLDER_FONT_SIZE: u32 = 19;

/// Ordinal code of one country under one category.
pub fn ordinal_for(
    category: &CategoryDefinition,
    country: &CountryRecord,
) -> Result<Severity, RenderError> {
    let raw = country
        .value(&category.title)
        .ok_or_else(|| RenderError::MissingValue {
            country: country.name.clone(),
            category: category.title.clone(),
        })?;
    category
        .severity_of(raw)
        .ok_or_else(|| RenderError::UnknownStatus {
            country: country.name.clone(),
            category: category.title.clone(),
            value: raw.to_string(),
        })
}

/// Hover text: bold country name, raw value, then any extra tooltip.
pub fn hover_text(name: &str, raw: &str, extra: Option<&str>) -> String {
    match extra {
        Some(extra) if !extra.is_empty() => format!("<b>{name}</b>: {raw}<br>{extra}"),
        _ => format!("<b>{name}</b>: {raw}"),
    }
}

/// Render the choropleth for one category.
pub fn render_map(
    registry: &CategoryRegistry,
    index: CategoryIndex,
    dataset: &Dataset,
    geo: &Arc<GeoBoundary>,
) -> Result<Figure, RenderError> {
    let category = registry.get(index)?;
    let countries = dataset.countries();

    let mut locations = Vec::with_capacity(countries.len());
    let mut z = Vec::with_capacity(countries.len());
    let mut text = Vec::with_capacity(countries.len());

    for country in countries {
        let code = ordinal_for(category, country)?;
        let raw = country.value(&category.title).unwrap_or_default();
        locations.push(country.code.clone());
        z.push(code);
        text.push(hover_text(
            &country.name,
            raw,
            dataset.tooltip(&country.name, &category.title),
        ));
    }

    let scale = ColorScale::from_observed(z.iter().copied());
    let trace = ChoroplethTrace {
        locations: Some(locations),
        zmin: scale.min(),
        zmax: scale.max(),
        z: Some(z),
        colorscale: Some(scale),
        text: Some(text),
        hoverinfo: Some("text"),
        ..ChoroplethTrace::outline(Arc::clone(geo))
    };

    Ok(Figure::single(trace, Layout::europe()))
}

/// Render the boundary set with the introductory annotation and no data.
pub fn render_placeholder(geo: &Arc<GeoBoundary>) -> Figure {
    let mut layout = Layout::europe();
    layout.annotations.push(Annotation {
        align: "left",
        font: Font {
            family: None,
            size: Some(PLACEHOLDER_FONT_SIZE),
            color: Some(PLACEHOLDER_COLOR),
        },
        text: PLACEHOLDER_TEXT.to_string(),
        showarrow: false,
    });
    Figure::single(ChoroplethTrace::outline(Arc::clone(geo)), layout)
}

/// Every category that fails to render, with its fault.
pub fn integrity_faults(
    registry: &CategoryRegistry,
    dataset: &Dataset,
) -> Vec<(CategoryIndex, RenderError)> {
    registry
        .iter()
        .flat_map(|(index, category)| {
            dataset
                .countries()
                .iter()
                .filter_map(move |country| ordinal_for(category, country).err())
                .map(move |err| (index, err))
        })
        .collect()
}
