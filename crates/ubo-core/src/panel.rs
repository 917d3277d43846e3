//! # Panel State Machine
//!
//! The accordion keeps exactly one category panel open, and the map always
//! shows the open category. The state is an enum with N + 1 values: one per
//! category plus the placeholder shown before the first click. There are
//! no per-panel flags to keep consistent; the open/closed vector is derived.
//!
//! ```text
//!                 toggle(i)                 toggle(j)
//!  Placeholder ─────────────▶ Active(i) ─────────────▶ Active(j)
//!       │                        ▲  │
//!       └── initial(First) ──────┘  └─ toggle(i) keeps Active(i)
//! ```

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::category::{CategoryIndex, CategoryRegistry};
use crate::dataset::Dataset;
use crate::error::RenderError;
use crate::figure::Figure;
use crate::geo::GeoBoundary;
use crate::render::{render_map, render_placeholder};

/// Which state a fresh page starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSelection {
    /// Show the introductory map with every panel closed.
    #[default]
    Placeholder,
    /// Open the first category.
    First,
}

impl FromStr for DefaultSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" | "start" => Ok(Self::Placeholder),
            "first" | "0" => Ok(Self::First),
            other => Err(format!(
                "unknown default selection {other:?} (expected \"placeholder\" or \"first\")"
            )),
        }
    }
}

/// A click on a category toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleEvent {
    /// The clicked category.
    pub index: usize,
}

impl ToggleEvent {
    /// The DOM id of the toggle control for a category.
    pub fn control_id(index: CategoryIndex) -> String {
        format!("group-{index}-toggle")
    }
}

impl FromStr for ToggleEvent {
    type Err = RenderError;

    /// Parse a control id of the form `group-{index}-toggle`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RenderError::MalformedEvent(s.to_string());
        let digits = s
            .strip_prefix("group-")
            .and_then(|rest| rest.strip_suffix("-toggle"))
            .ok_or_else(malformed)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index = digits.parse().map_err(|_| malformed())?;
        Ok(Self { index })
    }
}

/// The accordion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum PanelState {
    /// No category chosen yet.
    Placeholder,
    /// One category open.
    Active(CategoryIndex),
}

impl PanelState {
    /// Deterministic starting state.
    pub fn initial(default: DefaultSelection) -> Self {
        match default {
            DefaultSelection::Placeholder => Self::Placeholder,
            DefaultSelection::First => Self::Active(CategoryIndex(0)),
        }
    }

    /// Restore a client's previous selection, or start fresh.
    pub fn resume(
        previous: Option<usize>,
        default: DefaultSelection,
        registry: &CategoryRegistry,
    ) -> Result<Self, RenderError> {
        match previous {
            Some(index) => Ok(Self::Active(registry.index(index)?)),
            None => Ok(Self::initial(default)),
        }
    }

    /// Apply a click. The clicked panel opens, every other panel closes.
    pub fn toggle(
        self,
        event: ToggleEvent,
        registry: &CategoryRegistry,
    ) -> Result<Self, RenderError> {
        let index = registry.index(event.index)?;
        if self != Self::Active(index) {
            tracing::debug!(from = ?self, to = %index, "panel toggled");
        }
        Ok(Self::Active(index))
    }

    /// The open category, if any.
    pub fn active(self) -> Option<CategoryIndex> {
        match self {
            Self::Placeholder => None,
            Self::Active(index) => Some(index),
        }
    }

    /// One flag per category, true only at the open one.
    pub fn open_flags(self, count: usize) -> Vec<bool> {
        let active = self.active().map(CategoryIndex::get);
        (0..count).map(|i| Some(i) == active).collect()
    }

    /// Flags plus the matching figure.
    pub fn render(
        self,
        registry: &CategoryRegistry,
        dataset: &Dataset,
        geo: &Arc<GeoBoundary>,
    ) -> Result<PanelView, RenderError> {
        let figure = match self {
            Self::Placeholder => render_placeholder(geo),
            Self::Active(index) => render_map(registry, index, dataset, geo)?,
        };
        Ok(PanelView {
            active: self.active(),
            open: self.open_flags(registry.len()),
            figure,
        })
    }
}

/// What the presentation layer draws after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    /// The open category.
    pub active: Option<CategoryIndex>,
    /// Open flag per category.
    pub open: Vec<bool>,
    /// The map.
    pub figure: Figure,
}
