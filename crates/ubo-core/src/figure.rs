//! # Choropleth Figure
//!
//! The map payload handed to the presentation layer. It serialises to the
//! `{ "data": [...], "layout": {...} }` shape a Plotly client renders
//! directly, so the browser never has to know about categories or status
//! maps.

use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::geo::{GeoBoundary, FEATURE_ID_KEY};
use crate::severity::Severity;

/// Ocean fill colour behind the country polygons.
pub const OCEAN_COLOR: &str = "#FFF0E6";
/// Font family used for the map.
pub const FONT_FAMILY: &str = "'Mulish', sans-serif";
/// Latitude range framing continental Europe.
pub const LAT_RANGE: [f64; 2] = [38.0, 70.0];
/// Longitude range framing continental Europe.
pub const LON_RANGE: [f64; 2] = [-24.0, 34.0];

/// A full figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Exactly one choropleth trace.
    pub data: Vec<ChoroplethTrace>,
    /// Geo layout and decorations.
    pub layout: Layout,
}

impl Figure {
    /// Wrap one trace.
    pub fn single(trace: ChoroplethTrace, layout: Layout) -> Self {
        Self {
            data: vec![trace],
            layout,
        }
    }

    /// The choropleth trace.
    pub fn trace(&self) -> Option<&ChoroplethTrace> {
        self.data.first()
    }
}

/// A choropleth trace over a caller-supplied GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    /// Always `"choropleth"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Always `"geojson-id"`: locations match feature ids.
    pub locationmode: &'static str,
    /// The boundary set.
    pub geojson: Arc<GeoBoundary>,
    /// Where the join key sits in each feature.
    pub featureidkey: &'static str,
    /// Country codes, one per dataset row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    /// Ordinal code per location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Severity>>,
    /// Lowest observed code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmin: Option<Severity>,
    /// Highest observed code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmax: Option<Severity>,
    /// Colours of the observed codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<ColorScale>,
    /// Hover text per location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    /// `"text"` when hover text is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<&'static str>,
    /// The built-in colour bar; always hidden.
    pub showscale: bool,
}

impl ChoroplethTrace {
    /// A trace drawing the boundaries only.
    pub fn outline(geojson: Arc<GeoBoundary>) -> Self {
        Self {
            kind: "choropleth",
            locationmode: "geojson-id",
            geojson,
            featureidkey: FEATURE_ID_KEY,
            locations: None,
            z: None,
            zmin: None,
            zmax: None,
            colorscale: None,
            text: None,
            hoverinfo: None,
            showscale: false,
        }
    }
}

/// Colour scale restricted to the codes present in one render.
///
/// Holds distinct codes in ascending order. Each stop sits at
/// `(code - min) / (max - min)`, which together with `zmin`/`zmax` on the
/// trace puts every observed code exactly on its own colour.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorScale {
    codes: Vec<Severity>,
}

impl ColorScale {
    /// Build from observed codes in any order, with repeats.
    pub fn from_observed(observed: impl IntoIterator<Item = Severity>) -> Self {
        let mut codes: Vec<Severity> = observed.into_iter().collect();
        codes.sort();
        codes.dedup();
        Self { codes }
    }

    /// Distinct codes, ascending.
    pub fn codes(&self) -> &[Severity] {
        &self.codes
    }

    /// Colours of the distinct codes, ascending by code.
    pub fn colors(&self) -> Vec<&'static str> {
        self.codes.iter().map(|c| c.color()).collect()
    }

    /// Lowest code.
    pub fn min(&self) -> Option<Severity> {
        self.codes.first().copied()
    }

    /// Highest code.
    pub fn max(&self) -> Option<Severity> {
        self.codes.last().copied()
    }

    /// `(position, colour)` stops as sent to the client.
    pub fn stops(&self) -> Vec<(f64, &'static str)> {
        match (self.min(), self.max()) {
            (Some(lo), Some(hi)) if lo == hi => vec![(0.0, lo.color()), (1.0, hi.color())],
            (Some(lo), Some(hi)) => {
                let span = f64::from(hi.code() - lo.code());
                self.codes
                    .iter()
                    .map(|c| (f64::from(c.code() - lo.code()) / span, c.color()))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no code was observed.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Serialize for ColorScale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stops = self.stops();
        let mut seq = serializer.serialize_seq(Some(stops.len()))?;
        for stop in &stops {
            seq.serialize_element(stop)?;
        }
        seq.end()
    }
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Map framing.
    pub geo: GeoLayout,
    /// Plotly legend; the accordion draws its own.
    pub showlegend: bool,
    /// Panning disabled.
    pub dragmode: bool,
    /// Zero margins.
    pub margin: Margin,
    /// Base font.
    pub font: Font,
    /// Text overlays; only the placeholder uses one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    /// The fixed European layout without annotations.
    pub fn europe() -> Self {
        Self {
            geo: GeoLayout::europe(),
            showlegend: false,
            dragmode: false,
            margin: Margin::default(),
            font: Font {
                family: Some(FONT_FAMILY),
                ..Font::default()
            },
            annotations: Vec::new(),
        }
    }
}

/// Geo subplot settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    /// Base map scope.
    pub scope: &'static str,
    /// Subplot domain.
    pub domain: Domain,
    /// Visible latitudes.
    pub lataxis: AxisRange,
    /// Visible longitudes.
    pub lonaxis: AxisRange,
    /// Base-map coastlines.
    pub showcoastlines: bool,
    /// Base-map resolution (1:50m).
    pub resolution: u32,
    /// Frame around the map.
    pub showframe: bool,
    /// Projection.
    pub projection: Projection,
    /// Base-map land fill.
    pub showland: bool,
    /// Ocean fill.
    pub showocean: bool,
    /// Ocean colour.
    pub oceancolor: &'static str,
}

impl GeoLayout {
    /// Mercator framing of continental Europe.
    pub fn europe() -> Self {
        Self {
            scope: "europe",
            domain: Domain {
                x: [0.0, 1.0],
                y: [0.0, 1.0],
            },
            lataxis: AxisRange { range: LAT_RANGE },
            lonaxis: AxisRange { range: LON_RANGE },
            showcoastlines: false,
            resolution: 50,
            showframe: false,
            projection: Projection { kind: "mercator" },
            showland: false,
            showocean: true,
            oceancolor: OCEAN_COLOR,
        }
    }
}

/// Subplot domain in paper coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    /// Horizontal extent.
    pub x: [f64; 2],
    /// Vertical extent.
    pub y: [f64; 2],
}

/// Axis range in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    /// `[min, max]`.
    pub range: [f64; 2],
}

/// Map projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Projection name.
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Figure margins in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// Font settings; unset fields inherit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

/// Free-floating text on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Text alignment.
    pub align: &'static str,
    /// Text font.
    pub font: Font,
    /// HTML-lite text (`<br>`, `<b>`).
    pub text: String,
    /// No pointer arrow.
    pub showarrow: bool,
}
