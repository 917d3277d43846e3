//! # Page Routing
//!
//! Two views exist. `/about` is the informational page; every other path,
//! including unknown ones, is the home view with the accordion and map.
//! Routing carries no state: the panel selection lives in [`crate::panel`]
//! and survives a round trip through `/about` untouched.

use serde::Serialize;

/// Path of the informational view.
pub const ABOUT_PATH: &str = "/about";

/// A top-level page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Accordion plus choropleth.
    Home,
    /// Background and downloads.
    About,
}

impl View {
    /// Select the view for a request path.
    pub fn resolve(path: &str) -> Self {
        if path == ABOUT_PATH {
            Self::About
        } else {
            Self::Home
        }
    }
}
