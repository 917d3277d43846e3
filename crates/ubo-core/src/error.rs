//! # Error Types
//!
//! Two failure classes exist in the atlas, and they never mix:
//!
//! - [`LoadError`] — startup faults. A missing or malformed dataset,
//!   boundary file or registry. The process must not serve traffic with
//!   partial data, so these are fatal to whoever loads the atlas.
//! - [`RenderError`] — faults discovered while rendering one category or
//!   resolving one UI event. These fail that render only and carry enough
//!   context (country, category, raw value) to fix the data.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the atlas.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// A startup load fault.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A render or event-resolution fault.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Faults raised while loading the registry, dataset or boundary set.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A required file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV file is not well-formed.
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        /// The offending file.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A CSV file lacks a column the registry requires.
    #[error("{path} is missing required column {column:?}")]
    MissingColumn {
        /// The offending file.
        path: PathBuf,
        /// The absent column header.
        column: String,
    },

    /// The same country appears twice in one table.
    #[error("{path} lists country {country:?} more than once")]
    DuplicateCountry {
        /// The offending file.
        path: PathBuf,
        /// The repeated country name.
        country: String,
    },

    /// The boundary file is not a usable GeoJSON feature collection.
    #[error("invalid boundary set: {0}")]
    Geo(String),

    /// The boundary file is not valid JSON.
    #[error("boundary file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The registry file is not valid YAML.
    #[error("registry file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The registry content is structurally invalid.
    #[error("invalid category registry: {0}")]
    Registry(String),

    /// An ordinal code outside 0..=4.
    #[error("ordinal code {0} is outside 0..=4")]
    OrdinalOutOfRange(u8),
}

/// Faults raised while rendering a category or resolving a panel event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A country's raw value is not a label of the category's status map.
    #[error("country {country:?} has value {value:?} for category {category:?}, which is not in its status map")]
    UnknownStatus {
        /// Country display name.
        country: String,
        /// Category title.
        category: String,
        /// The unmapped raw value.
        value: String,
    },

    /// A country record has no value at all for the category.
    #[error("country {country:?} has no value for category {category:?}")]
    MissingValue {
        /// Country display name.
        country: String,
        /// Category title.
        category: String,
    },

    /// A category index outside the registry.
    #[error("category index {index} is out of range (registry holds {count} categories)")]
    CategoryOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of categories in the registry.
        count: usize,
    },

    /// A UI event identifier that does not name a category toggle.
    #[error("malformed toggle event {0:?}")]
    MalformedEvent(String),
}

impl RenderError {
    /// Whether this error reflects a defect in the curated dataset rather
    /// than in the caller's request.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::UnknownStatus { .. } | Self::MissingValue { .. }
        )
    }
}
