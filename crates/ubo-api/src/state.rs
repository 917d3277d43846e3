//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The loaded [`Atlas`] is immutable after startup, so the state holds it
//! behind an `Arc` with no lock. Panel selection is not stored here: each
//! client sends its previous selection with every update request.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;

use ubo_core::{Atlas, AtlasSources, DataSources, DefaultSelection};

/// Configuration errors raised while reading the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `ATLAS_DEFAULT_SELECTION` holds an unknown value.
    #[error("ATLAS_DEFAULT_SELECTION: {0}")]
    DefaultSelection(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory holding the CSV tables.
    pub data_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// GeoJSON boundary file.
    pub geo_file: PathBuf,
    /// Optional YAML registry replacing the built-in categories.
    pub registry_file: Option<PathBuf>,
    /// State a fresh page starts in.
    pub default_selection: DefaultSelection,
    /// Whether `/metrics` and request counting are mounted.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_data_dir(PathBuf::from("data"))
    }
}

impl AppConfig {
    /// Defaults rooted at one data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let sources = AtlasSources::in_dir(&data_dir);
        Self {
            port: 8080,
            static_dir: data_dir.clone(),
            geo_file: sources.geo,
            data_dir,
            registry_file: None,
            default_selection: DefaultSelection::default(),
            metrics_enabled: true,
        }
    }

    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("ATLAS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let mut config = Self::with_data_dir(data_dir);

        config.port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        if let Some(dir) = lookup("ATLAS_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("ATLAS_GEO_FILE") {
            config.geo_file = PathBuf::from(file);
        }
        config.registry_file = lookup("ATLAS_REGISTRY_FILE").map(PathBuf::from);
        if let Some(value) = lookup("ATLAS_DEFAULT_SELECTION") {
            config.default_selection = value.parse().map_err(ConfigError::DefaultSelection)?;
        }
        config.metrics_enabled = lookup("ATLAS_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(config)
    }

    /// Where the atlas is loaded from.
    pub fn sources(&self) -> AtlasSources {
        AtlasSources {
            data: DataSources::in_dir(&self.data_dir),
            geo: self.geo_file.clone(),
            registry: self.registry_file.clone(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registry, dataset and boundaries loaded at startup.
    pub atlas: Arc<Atlas>,
    pub config: Arc<AppConfig>,
    /// Prometheus exporter handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("categories", &self.atlas.registry().len())
            .field("countries", &self.atlas.dataset().countries().len())
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Wrap a loaded atlas with its configuration.
    pub fn new(atlas: Atlas, config: AppConfig) -> Self {
        Self {
            atlas: Arc::new(atlas),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
