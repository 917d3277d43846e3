//! # Category Registry
//!
//! The ordered list of policy categories the atlas compares. Each category
//! has a display title (also the dataset column header), an ordered status
//! map from raw textual value to [`Severity`], and a description shown in
//! the accordion.
//!
//! The registry is built once at startup, either from the built-in UBO
//! definitions ([`CategoryRegistry::builtin`]) or from a YAML file, and is
//! immutable afterwards. Indices handed to the renderer and the panel state
//! machine are generated from this same list, so an index outside it is a
//! contract violation and is rejected, never clamped.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, RenderError};
use crate::severity::Severity;

/// Position of a category in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryIndex(pub usize);

impl CategoryIndex {
    /// The raw position.
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CategoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw value a category recognises, and its ordinal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Raw textual value as it appears in the dataset.
    pub label: String,
    /// Ordinal code for the value.
    pub code: Severity,
}

/// A legend row: what the accordion shows under a category description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Raw textual value.
    pub label: String,
    /// Ordinal code.
    pub code: Severity,
    /// Colour swatch for the code.
    pub color: &'static str,
}

/// One policy category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Display title, unique across the registry, and the dataset column key.
    pub title: String,
    /// Ordered status map. Order is the legend order.
    pub statuses: Vec<StatusEntry>,
    /// Text shown when the category panel is open.
    pub description: String,
    /// Code used for raw values absent from `statuses`. `None` means an
    /// unmapped value fails the render.
    #[serde(default)]
    pub fallback: Option<Severity>,
}

impl CategoryDefinition {
    /// Build a strict category (no fallback) from label/code pairs.
    pub fn new(title: &str, statuses: &[(&str, Severity)], description: &str) -> Self {
        Self {
            title: title.to_string(),
            statuses: statuses
                .iter()
                .map(|(label, code)| StatusEntry {
                    label: (*label).to_string(),
                    code: *code,
                })
                .collect(),
            description: description.to_string(),
            fallback: None,
        }
    }

    /// Look up the ordinal code of a raw value, honouring the fallback policy.
    pub fn severity_of(&self, raw: &str) -> Option<Severity> {
        self.statuses
            .iter()
            .find(|entry| entry.label == raw)
            .map(|entry| entry.code)
            .or(self.fallback)
    }

    /// Legend rows in status-map order.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.statuses
            .iter()
            .map(|entry| LegendEntry {
                label: entry.label.clone(),
                code: entry.code,
                color: entry.code.color(),
            })
            .collect()
    }
}

/// The ordered, immutable list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDefinition>,
}

impl CategoryRegistry {
    /// Build a registry, validating titles and status maps.
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self, LoadError> {
        if categories.is_empty() {
            return Err(LoadError::Registry("registry holds no categories".into()));
        }
        let mut titles = HashSet::new();
        for category in &categories {
            if category.title.trim().is_empty() {
                return Err(LoadError::Registry("category with empty title".into()));
            }
            if !titles.insert(category.title.as_str()) {
                return Err(LoadError::Registry(format!(
                    "duplicate category title {:?}",
                    category.title
                )));
            }
            if category.statuses.is_empty() {
                return Err(LoadError::Registry(format!(
                    "category {:?} has an empty status map",
                    category.title
                )));
            }
            let mut labels = HashSet::new();
            for entry in &category.statuses {
                if !labels.insert(entry.label.as_str()) {
                    return Err(LoadError::Registry(format!(
                        "category {:?} maps label {:?} twice",
                        category.title, entry.label
                    )));
                }
            }
        }
        Ok(Self { categories })
    }

    /// Parse a registry from YAML text.
    ///
    /// ```yaml
    /// categories:
    ///   - title: Paywall
    ///     description: Whether extracts cost money.
    ///     statuses:
    ///       - { label: "no", code: 1 }
    ///       - { label: "yes", code: 4 }
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let parsed: CategoryRegistry = serde_yaml::from_str(text)?;
        Self::new(parsed.categories)
    }

    /// Read and parse a YAML registry file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Validate an index against the registry.
    pub fn index(&self, index: usize) -> Result<CategoryIndex, RenderError> {
        if index < self.categories.len() {
            Ok(CategoryIndex(index))
        } else {
            Err(RenderError::CategoryOutOfRange {
                index,
                count: self.categories.len(),
            })
        }
    }

    /// The category at `index`.
    pub fn get(&self, index: CategoryIndex) -> Result<&CategoryDefinition, RenderError> {
        self.categories
            .get(index.0)
            .ok_or(RenderError::CategoryOutOfRange {
                index: index.0,
                count: self.categories.len(),
            })
    }

    /// Find a category by title.
    pub fn by_title(&self, title: &str) -> Option<(CategoryIndex, &CategoryDefinition)> {
        self.categories
            .iter()
            .enumerate()
            .find(|(_, c)| c.title == title)
            .map(|(i, c)| (CategoryIndex(i), c))
    }

    /// Iterate `(index, category)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryIndex, &CategoryDefinition)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, c)| (CategoryIndex(i), c))
    }

    /// The seven UBO register categories.
    pub fn builtin() -> Self {
        use Severity::*;

        let categories = vec![
            CategoryDefinition::new(
                "UBO implementation status",
                &[("implemented", Good), ("not implemented", Bad)],
                "As required by the 4th and 5th European Union’s Anti-Money Laundering Directive (AMLD) EU countries need to have established beneficial ownership registers by 10 January 2020. Which ones have done so, and which ones have failed to do so?",
            ),
            CategoryDefinition::new(
                DATA_FIELDS_TITLE,
                &[
                    ("N/A", NotApplicable),
                    ("all data", Good),
                    ("most data", Fair),
                    ("some data", Poor),
                ],
                "Not every country publishes all information in their B.O. register. Hover/click each country to see if they publish the name, month and year of birth, country of residence, nationality, nature of interest and extent of interest of each beneficial owner.",
            ),
            CategoryDefinition::new(
                "Who has access?",
                &[
                    ("N/A", NotApplicable),
                    ("public", Good),
                    ("general public with legitimate interest", Fair),
                    ("public only nationals and EU citizens", Poor),
                    ("not public", Bad),
                ],
                "EU countries are obliged to provide public access to beneficial ownership according to AMLD 5. Many countries do not comply. They restrict access to this data by closing off these registers to the public, only allowing public authorities to access them, only granting people access after disclosing their purpose of accessing beneficial ownership data or requiring e-identification or a national tax identification from users.",
            ),
            CategoryDefinition::new(
                "Paywall",
                &[("N/A", NotApplicable), ("no", Good), ("yes", Bad)],
                "A threshold in accessing beneficial ownership data is enforcing a paywall. To access a beneficial ownership extract of a company, most EU countries charge a fee. Prices of beneficial ownership extracts (legal entity or person) fall in the range of €2,50 to €27,- per extract.",
            ),
            CategoryDefinition::new(
                "Registration required",
                &[("N/A", NotApplicable), ("no", Good), ("yes", Bad)],
                "To keep track of who uses beneficial ownership registers, EU countries have implemented complicated registration systems. People that want to access these registers in many cases need a national digital identification document. This limits foreign authorities or persons to access and use beneficial ownership data.",
            ),
            CategoryDefinition::new(
                "Structured data in machine readable format",
                &[("N/A", NotApplicable), ("yes", Good), ("no", Bad)],
                "How data is published determines its (re)usability. Only two countries publish data in their registers as structured data and in machine readable formats (Denmark and Latvia). These countries allow (re)users to download the full dataset and access individual data through an A.P.I. Most EU countries still publish beneficial ownership extracts in PDF format instead of open data formats, limiting its reusability.",
            ),
            CategoryDefinition::new(
                "Search for persons/legal entities",
                &[
                    ("N/A", NotApplicable),
                    ("legal entity and person", Good),
                    ("legal entity", Poor),
                ],
                "The usability of beneficial ownership registers is also determined by their functionalities, for example how data can be searched. In almost all EU countries users can only search by company name, and on a name of a beneficial owner. Only in five countries it is possible to search by company name and beneficial owner.",
            ),
        ];

        Self { categories }
    }
}

/// Title of the category whose values may come from the data-fields table.
pub const DATA_FIELDS_TITLE: &str = "Data fields";
