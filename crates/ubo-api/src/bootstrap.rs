//! # Atlas Bootstrap
//!
//! Loads everything the server needs before the listener binds.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Atlas**: registry (built-in or YAML), CSV tables, boundaries.
//!    Any failure aborts startup.
//! 2. **Audit Categories**: render every category once. A category whose
//!    data holds an unmapped value still boots, but each fault is logged so
//!    the operator sees it before a visitor does.
//! 3. **Check Static Directory**: warn when the download links would 404.
//! 4. **Log Banner**: structured summary of what was loaded.

use std::collections::BTreeSet;

use ubo_core::{Atlas, CategoryIndex, LoadError, RenderError};

use crate::state::{AppConfig, AppState};

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A data, boundary or registry file failed to load.
    #[error("failed to load atlas: {0}")]
    Load(#[from] LoadError),
}

/// Load the atlas described by `config` and wrap it in application state.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let atlas = Atlas::load(&config.sources())?;

    let faults = atlas.integrity_faults();
    for (index, fault) in &faults {
        tracing::error!(category = %index, error = %fault, "category cannot be rendered");
    }

    if !config.static_dir.is_dir() {
        tracing::warn!(
            path = %config.static_dir.display(),
            "static directory not found; downloads will return 404"
        );
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        geo_file = %config.geo_file.display(),
        registry = config
            .registry_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "builtin".to_string()),
        default_selection = ?config.default_selection,
        faults = faults.len(),
        faulty_categories = faulty_categories(&faults),
        "UBO Atlas bootstrapped"
    );

    Ok(AppState::new(atlas, config))
}

/// Number of distinct categories among per-country faults.
fn faulty_categories(faults: &[(CategoryIndex, RenderError)]) -> usize {
    faults
        .iter()
        .map(|(index, _)| *index)
        .collect::<BTreeSet<_>>()
        .len()
}
