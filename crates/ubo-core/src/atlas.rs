//! # Loaded Atlas
//!
//! Bundles the registry, dataset and boundary set loaded at startup. The
//! bundle is immutable; servers share it behind an `Arc` and every render
//! borrows it read-only.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::category::{CategoryIndex, CategoryRegistry};
use crate::dataset::{DataSources, Dataset};
use crate::error::{LoadError, RenderError};
use crate::figure::Figure;
use crate::geo::{GeoBoundary, BOUNDARY_FILE};
use crate::panel::{PanelState, PanelView};
use crate::render::{integrity_faults, render_map, render_placeholder};

/// Where everything is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasSources {
    /// The CSV tables.
    pub data: DataSources,
    /// The GeoJSON boundary file.
    pub geo: PathBuf,
    /// A YAML registry replacing the built-in categories.
    pub registry: Option<PathBuf>,
}

impl AtlasSources {
    /// Default file names inside one data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data: DataSources::in_dir(dir),
            geo: dir.join(BOUNDARY_FILE),
            registry: None,
        }
    }
}

/// Registry, dataset and boundaries, loaded once.
#[derive(Debug, Clone)]
pub struct Atlas {
    registry: CategoryRegistry,
    dataset: Dataset,
    geo: Arc<GeoBoundary>,
}

impl Atlas {
    /// Bundle already loaded parts.
    pub fn new(registry: CategoryRegistry, dataset: Dataset, geo: GeoBoundary) -> Self {
        Self {
            registry,
            dataset,
            geo: Arc::new(geo),
        }
    }

    /// Load every part. Any failure is a startup fault.
    pub fn load(sources: &AtlasSources) -> Result<Self, LoadError> {
        let registry = match &sources.registry {
            Some(path) => CategoryRegistry::from_yaml_file(path)?,
            None => CategoryRegistry::builtin(),
        };
        let dataset = Dataset::load(&sources.data, &registry)?;
        let geo = GeoBoundary::from_file(&sources.geo)?;
        let atlas = Self::new(registry, dataset, geo);

        for code in atlas.unmatched_codes() {
            tracing::warn!(code, "country code has no boundary polygon; it will not be drawn");
        }
        tracing::info!(
            categories = atlas.registry.len(),
            countries = atlas.dataset.countries().len(),
            features = atlas.geo.len(),
            "atlas loaded"
        );
        Ok(atlas)
    }

    /// The category registry.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// The country dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The boundary set.
    pub fn geo(&self) -> &Arc<GeoBoundary> {
        &self.geo
    }

    /// Render one category by raw index.
    pub fn render(&self, index: usize) -> Result<Figure, RenderError> {
        let index = self.registry.index(index)?;
        render_map(&self.registry, index, &self.dataset, &self.geo)
    }

    /// Render the introductory map.
    pub fn placeholder(&self) -> Figure {
        render_placeholder(&self.geo)
    }

    /// Flags and figure for a panel state.
    pub fn view(&self, state: PanelState) -> Result<PanelView, RenderError> {
        state.render(&self.registry, &self.dataset, &self.geo)
    }

    /// Every data-integrity fault across all categories.
    pub fn integrity_faults(&self) -> Vec<(CategoryIndex, RenderError)> {
        integrity_faults(&self.registry, &self.dataset)
    }

    /// Dataset country codes without a boundary polygon.
    pub fn unmatched_codes(&self) -> Vec<&str> {
        self.geo
            .missing(self.dataset.countries().iter().map(|c| c.code.as_str()))
    }
}
