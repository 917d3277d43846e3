//! # ubo-cli — CLI Tool for the UBO Atlas
//!
//! Provides the `ubo` command-line interface for working with an atlas data
//! directory without starting the web service.
//!
//! ## Subcommands
//!
//! - `ubo categories` — list the registry with legends.
//! - `ubo validate` — load a data directory and render every category.
//! - `ubo render` — print one figure as Plotly JSON.
//!
//! ```bash
//! ubo categories --registry categories.yaml
//! ubo validate --data-dir data
//! ubo render --data-dir data --category 3 --pretty
//! ```
//!
//! Every handler writes to a caller-supplied sink and returns the process
//! exit code, so the binary stays a thin dispatcher.

pub mod categories;
pub mod render;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ubo_core::geo::BOUNDARY_FILE;
use ubo_core::{Atlas, AtlasSources, CategoryRegistry, DataSources};

/// Where to load an atlas from. Shared by `validate` and `render`.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory holding the CSV tables.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// GeoJSON boundary file [default: <data-dir>/custom.geo-50m-europe41.json].
    #[arg(long)]
    pub geo: Option<PathBuf>,

    /// YAML registry replacing the built-in categories.
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

impl SourceArgs {
    /// Resolve to loadable sources.
    pub fn sources(&self) -> AtlasSources {
        AtlasSources {
            data: DataSources::in_dir(&self.data_dir),
            geo: self
                .geo
                .clone()
                .unwrap_or_else(|| self.data_dir.join(BOUNDARY_FILE)),
            registry: self.registry.clone(),
        }
    }

    /// Load the atlas, attaching the data directory to any failure.
    pub fn load(&self) -> Result<Atlas> {
        Atlas::load(&self.sources())
            .with_context(|| format!("loading atlas from {}", self.data_dir.display()))
    }
}

/// Built-in registry, or the YAML file when one is given.
pub fn load_registry(path: Option<&Path>) -> Result<CategoryRegistry> {
    match path {
        Some(path) => CategoryRegistry::from_yaml_file(path)
            .with_context(|| format!("loading registry {}", path.display())),
        None => Ok(CategoryRegistry::builtin()),
    }
}
