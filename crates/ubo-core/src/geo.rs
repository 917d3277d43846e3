//! # Geographic Boundary Set
//!
//! A GeoJSON `FeatureCollection` of country polygons, keyed by the ISO
//! 3166-1 alpha-3 code stored at `properties.iso_a3` of each feature. The
//! collection is passed through to the map client untouched; the atlas
//! only checks its shape and indexes the join keys.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::LoadError;

/// Property holding the join key in each feature.
pub const FEATURE_ID_PROPERTY: &str = "iso_a3";

/// Dotted path of the join key, as the map client expects it.
pub const FEATURE_ID_KEY: &str = "properties.iso_a3";

/// Default boundary file name inside the data directory.
pub const BOUNDARY_FILE: &str = "custom.geo-50m-europe41.json";

/// Loaded boundary set.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBoundary {
    collection: Value,
    codes: BTreeSet<String>,
}

impl GeoBoundary {
    /// Validate a parsed GeoJSON document.
    ///
    /// Every feature must carry a string join key; a feature without one
    /// could never be coloured and indicates a wrong or corrupted file.
    pub fn from_value(collection: Value) -> Result<Self, LoadError> {
        match collection.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            other => {
                return Err(LoadError::Geo(format!(
                    "expected a FeatureCollection, found type {other:?}"
                )))
            }
        }
        let features = collection
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| LoadError::Geo("FeatureCollection has no features array".into()))?;

        let mut codes = BTreeSet::new();
        for (i, feature) in features.iter().enumerate() {
            let code = feature
                .get("properties")
                .and_then(|p| p.get(FEATURE_ID_PROPERTY))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    LoadError::Geo(format!("feature {i} has no string {FEATURE_ID_KEY}"))
                })?;
            codes.insert(code.to_string());
        }
        Ok(Self { collection, codes })
    }

    /// Parse GeoJSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Read and parse a GeoJSON file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether a country code has a polygon.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Every join key present, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Country codes from `codes` that have no polygon here.
    pub fn missing<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        codes.into_iter().filter(|c| !self.contains(c)).collect()
    }
}

impl Serialize for GeoBoundary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.collection.serialize(serializer)
    }
}
