//! # Country Dataset
//!
//! The per-country results table, the optional tooltip table, and the
//! optional data-fields table, loaded from CSV once at startup.
//!
//! ## Files
//!
//! - **results** (required): `Country`, `Country code`, then one column per
//!   category title holding the raw status value.
//! - **tooltips** (optional): `Country`, then one column per category title
//!   holding extra hover text. Joined to results by country name.
//! - **data fields** (optional): `Country`, `Ranking` and one column per
//!   published register field. `Ranking` becomes the country's raw value
//!   for the [`DATA_FIELDS_TITLE`] category; the field columns become that
//!   category's tooltip.
//!
//! Loading checks structure only (columns present, no duplicate countries).
//! Whether each raw value belongs to its category's status map is checked
//! per render, where the failure can name the category being drawn.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::category::{CategoryRegistry, DATA_FIELDS_TITLE};
use crate::error::LoadError;

/// Column holding the country display name in every table.
pub const COUNTRY_COLUMN: &str = "Country";
/// Column holding the ISO 3166-1 alpha-3 join key in the results table.
pub const COUNTRY_CODE_COLUMN: &str = "Country code";
/// Column holding the data-fields ranking.
pub const RANKING_COLUMN: &str = "Ranking";

/// Register fields listed in the data-fields tooltip, in display order.
pub const DATA_FIELD_COLUMNS: [&str; 7] = [
    "Name",
    "Month and year of birth",
    "Country of residence",
    "Nationality",
    "Nature of interest",
    "Extent of interest",
    "Additional information",
];

/// Default file names inside the data directory.
pub const RESULTS_FILE: &str = "ubo_atlas_data.csv";
/// Default tooltip file name.
pub const TOOLTIPS_FILE: &str = "ubo_atlas_data_tooltips.csv";
/// Default data-fields file name.
pub const DATA_FIELDS_FILE: &str = "ubo_atlas_data_fields.csv";

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
    /// Display name, also the tooltip join key.
    pub name: String,
    /// ISO 3166-1 alpha-3 code, the boundary join key.
    pub code: String,
    /// Raw value per category title.
    pub values: BTreeMap<String, String>,
}

impl CountryRecord {
    /// Raw value for a category title.
    pub fn value(&self, title: &str) -> Option<&str> {
        self.values.get(title).map(String::as_str)
    }
}

/// Extra hover text for one country, keyed by category title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipRecord {
    /// Country display name.
    pub country: String,
    /// Hover text per category title.
    pub texts: BTreeMap<String, String>,
}

/// One row of the data-fields table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFieldsRecord {
    /// Country display name.
    pub country: String,
    /// Raw value for the data-fields category.
    pub ranking: String,
    /// `(field, value)` pairs in [`DATA_FIELD_COLUMNS`] order.
    pub fields: Vec<(String, String)>,
}

impl DataFieldsRecord {
    /// Hover text listing every published field.
    pub fn tooltip(&self) -> String {
        self.fields
            .iter()
            .map(|(field, value)| format!("{field}: {value}<br>"))
            .collect()
    }
}

/// Paths of the three tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    /// Results table.
    pub results: PathBuf,
    /// Tooltip table, if any.
    pub tooltips: Option<PathBuf>,
    /// Data-fields table, if any.
    pub data_fields: Option<PathBuf>,
}

impl DataSources {
    /// Resolve the default file names inside `dir`. Optional tables are
    /// included only when the file exists.
    pub fn in_dir(dir: &Path) -> Self {
        let optional = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };
        Self {
            results: dir.join(RESULTS_FILE),
            tooltips: optional(TOOLTIPS_FILE),
            data_fields: optional(DATA_FIELDS_FILE),
        }
    }
}

/// The loaded, read-only dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    countries: Vec<CountryRecord>,
    tooltips: Vec<TooltipRecord>,
    tooltip_index: HashMap<String, usize>,
}

impl Dataset {
    /// Assemble a dataset from already parsed tables.
    pub fn new(
        countries: Vec<CountryRecord>,
        tooltips: Vec<TooltipRecord>,
    ) -> Result<Self, LoadError> {
        Self::assemble(
            countries,
            tooltips,
            Path::new(RESULTS_FILE),
            Path::new(TOOLTIPS_FILE),
        )
    }

    /// Duplicate rows are reported against the table they came from.
    fn assemble(
        countries: Vec<CountryRecord>,
        tooltips: Vec<TooltipRecord>,
        results_path: &Path,
        tooltips_path: &Path,
    ) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        for country in &countries {
            if !seen.insert(country.name.as_str()) {
                return Err(LoadError::DuplicateCountry {
                    path: results_path.to_path_buf(),
                    country: country.name.clone(),
                });
            }
        }
        let mut tooltip_index = HashMap::new();
        for (i, tooltip) in tooltips.iter().enumerate() {
            if tooltip_index.insert(tooltip.country.clone(), i).is_some() {
                return Err(LoadError::DuplicateCountry {
                    path: tooltips_path.to_path_buf(),
                    country: tooltip.country.clone(),
                });
            }
        }
        Ok(Self {
            countries,
            tooltips,
            tooltip_index,
        })
    }

    /// Load and join all tables, checking every registry title is present.
    pub fn load(sources: &DataSources, registry: &CategoryRegistry) -> Result<Self, LoadError> {
        let has_fields = sources.data_fields.is_some();
        let mut countries = load_results(&sources.results, registry, has_fields)?;

        let mut tooltips = match &sources.tooltips {
            Some(path) => load_tooltips(path)?,
            None => Vec::new(),
        };

        if let Some(path) = &sources.data_fields {
            let fields = load_data_fields(path)?;
            merge_data_fields(&mut countries, &mut tooltips, &fields);
        }

        tracing::debug!(
            countries = countries.len(),
            tooltips = tooltips.len(),
            "dataset loaded"
        );
        let tooltips_path = sources
            .tooltips
            .as_deref()
            .unwrap_or_else(|| Path::new(TOOLTIPS_FILE));
        Self::assemble(countries, tooltips, &sources.results, tooltips_path)
    }

    /// Countries in file order.
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    /// Tooltip rows in file order.
    pub fn tooltips(&self) -> &[TooltipRecord] {
        &self.tooltips
    }

    /// Extra hover text for a country and category, if any.
    pub fn tooltip(&self, country: &str, title: &str) -> Option<&str> {
        self.tooltip_index
            .get(country)
            .and_then(|&i| self.tooltips[i].texts.get(title))
            .map(String::as_str)
    }
}

/// Parsed CSV: header row plus data rows.
struct Table {
    origin: PathBuf,
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
}

impl Table {
    fn parse<R: Read>(reader: R, origin: &Path) -> Result<Self, LoadError> {
        let csv_err = |source: csv::Error| LoadError::Csv {
            path: origin.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;
        Ok(Self {
            origin: origin.to_path_buf(),
            headers,
            rows,
        })
    }

    fn open(path: &Path) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file, path)
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.column(name).ok_or_else(|| LoadError::MissingColumn {
            path: self.origin.clone(),
            column: name.to_string(),
        })
    }
}

fn cell(row: &csv::StringRecord, column: usize) -> String {
    row.get(column).unwrap_or_default().to_string()
}

fn load_results(
    path: &Path,
    registry: &CategoryRegistry,
    has_fields: bool,
) -> Result<Vec<CountryRecord>, LoadError> {
    parse_results(Table::open(path)?, registry, has_fields)
}

fn parse_results(
    table: Table,
    registry: &CategoryRegistry,
    has_fields: bool,
) -> Result<Vec<CountryRecord>, LoadError> {
    let name_col = table.require(COUNTRY_COLUMN)?;
    let code_col = table.require(COUNTRY_CODE_COLUMN)?;

    let mut category_cols = Vec::new();
    for category in registry.categories() {
        match table.column(&category.title) {
            Some(col) => category_cols.push((category.title.clone(), col)),
            None if has_fields && category.title == DATA_FIELDS_TITLE => {}
            None => {
                return Err(LoadError::MissingColumn {
                    path: table.origin.clone(),
                    column: category.title.clone(),
                })
            }
        }
    }

    Ok(table
        .rows
        .iter()
        .map(|row| CountryRecord {
            name: cell(row, name_col),
            code: cell(row, code_col),
            values: category_cols
                .iter()
                .map(|(title, col)| (title.clone(), cell(row, *col)))
                .collect(),
        })
        .collect())
}

fn load_tooltips(path: &Path) -> Result<Vec<TooltipRecord>, LoadError> {
    parse_tooltips(Table::open(path)?)
}

fn parse_tooltips(table: Table) -> Result<Vec<TooltipRecord>, LoadError> {
    let name_col = table.require(COUNTRY_COLUMN)?;
    Ok(table
        .rows
        .iter()
        .map(|row| TooltipRecord {
            country: cell(row, name_col),
            texts: table
                .headers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != name_col)
                .map(|(i, header)| (header.to_string(), cell(row, i)))
                .collect(),
        })
        .collect())
}

fn load_data_fields(path: &Path) -> Result<Vec<DataFieldsRecord>, LoadError> {
    parse_data_fields(Table::open(path)?)
}

fn parse_data_fields(table: Table) -> Result<Vec<DataFieldsRecord>, LoadError> {
    let name_col = table.require(COUNTRY_COLUMN)?;
    let ranking_col = table.require(RANKING_COLUMN)?;
    let field_cols: Vec<(&str, usize)> = DATA_FIELD_COLUMNS
        .iter()
        .filter_map(|field| table.column(field).map(|col| (*field, col)))
        .collect();

    Ok(table
        .rows
        .iter()
        .map(|row| DataFieldsRecord {
            country: cell(row, name_col),
            ranking: cell(row, ranking_col),
            fields: field_cols
                .iter()
                .map(|(field, col)| ((*field).to_string(), cell(row, *col)))
                .collect(),
        })
        .collect())
}

/// Fold the data-fields table into the results and tooltips.
///
/// A data-fields row for a country missing from the results is ignored
/// with a warning. A country missing from the tooltip table gets a fresh
/// tooltip row.
pub fn merge_data_fields(
    countries: &mut [CountryRecord],
    tooltips: &mut Vec<TooltipRecord>,
    fields: &[DataFieldsRecord],
) {
    for row in fields {
        let Some(country) = countries.iter_mut().find(|c| c.name == row.country) else {
            tracing::warn!(country = %row.country, "data-fields row has no matching country; ignored");
            continue;
        };
        country
            .values
            .insert(DATA_FIELDS_TITLE.to_string(), row.ranking.clone());

        let text = row.tooltip();
        match tooltips.iter_mut().find(|t| t.country == row.country) {
            Some(tooltip) => {
                tooltip.texts.insert(DATA_FIELDS_TITLE.to_string(), text);
            }
            None => tooltips.push(TooltipRecord {
                country: row.country.clone(),
                texts: BTreeMap::from([(DATA_FIELDS_TITLE.to_string(), text)]),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use crate::category::CategoryDefinition;

    fn table(text: &str) -> Table {
        Table::parse(text.as_bytes(), Path::new("inline.csv")).unwrap()
    }

    fn two_categories() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            CategoryDefinition::new("Paywall", &[("no", Severity::Good), ("yes", Severity::Bad)], ""),
            CategoryDefinition::new(
                DATA_FIELDS_TITLE,
                &[("all data", Severity::Good), ("some data", Severity::Poor)],
                "",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn results_keep_file_order_and_trim_cells() {
        let csv = "Country,Country code,Paywall,Data fields\n\
                   Austria , AUT ,yes,some data\n\
                   Belgium,BEL,no,all data\n";
        let countries = parse_results(table(csv), &two_categories(), false).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Austria");
        assert_eq!(countries[0].code, "AUT");
        assert_eq!(countries[0].value("Paywall"), Some("yes"));
        assert_eq!(countries[1].value(DATA_FIELDS_TITLE), Some("all data"));
    }

    #[test]
    fn missing_category_column_is_a_load_fault() {
        let csv = "Country,Country code,Paywall\nAustria,AUT,yes\n";
        let err = parse_results(table(csv), &two_categories(), false).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column, .. } if column == DATA_FIELDS_TITLE
        ));
    }

    #[test]
    fn data_fields_column_may_come_from_fields_table() {
        let csv = "Country,Country code,Paywall\nAustria,AUT,yes\n";
        let countries = parse_results(table(csv), &two_categories(), true).unwrap();
        assert_eq!(countries[0].value(DATA_FIELDS_TITLE), None);
    }

    #[test]
    fn missing_country_code_column_is_a_load_fault() {
        let csv = "Country,Paywall,Data fields\nAustria,yes,all data\n";
        assert!(parse_results(table(csv), &two_categories(), false).is_err());
    }

    #[test]
    fn ragged_rows_are_a_load_fault() {
        let result = Table::parse(
            "Country,Country code\nAustria,AUT,extra\n".as_bytes(),
            Path::new("inline.csv"),
        );
        assert!(matches!(result, Err(LoadError::Csv { .. })));
    }

    #[test]
    fn merge_sets_ranking_and_tooltip() {
        let csv = "Country,Country code,Paywall\nAustria,AUT,yes\nBelgium,BEL,no\n";
        let mut countries = parse_results(table(csv), &two_categories(), true).unwrap();
        let mut tooltips = parse_tooltips(table("Country,Paywall\nAustria,€3 per extract\n")).unwrap();
        let fields = parse_data_fields(table(
            "Country,Ranking,Name,Nationality\n\
             Austria,some data,yes,no\n\
             Belgium,all data,yes,yes\n\
             Narnia,all data,yes,yes\n",
        ))
        .unwrap();

        merge_data_fields(&mut countries, &mut tooltips, &fields);

        assert_eq!(countries[0].value(DATA_FIELDS_TITLE), Some("some data"));
        assert_eq!(countries[1].value(DATA_FIELDS_TITLE), Some("all data"));
        assert_eq!(tooltips.len(), 2);
        assert_eq!(
            tooltips[0].texts.get(DATA_FIELDS_TITLE).unwrap(),
            "Name: yes<br>Nationality: no<br>"
        );
        assert_eq!(tooltips[1].country, "Belgium");
    }

    #[test]
    fn duplicate_countries_are_rejected() {
        let record = CountryRecord {
            name: "Austria".into(),
            code: "AUT".into(),
            values: BTreeMap::new(),
        };
        let err = Dataset::new(vec![record.clone(), record], Vec::new()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateCountry { .. }));
    }

    #[test]
    fn duplicate_country_names_the_loaded_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("atlas-2021.csv");
        std::fs::write(
            &results,
            "Country,Country code,Paywall,Data fields\n\
             Austria,AUT,yes,all data\n\
             Austria,AUT,no,all data\n",
        )
        .unwrap();
        let sources = DataSources {
            results: results.clone(),
            tooltips: None,
            data_fields: None,
        };
        let err = Dataset::load(&sources, &two_categories()).unwrap_err();
        match err {
            LoadError::DuplicateCountry { path, country } => {
                assert_eq!(path, results);
                assert_eq!(country, "Austria");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tooltip_lookup_joins_by_name() {
        let tooltips = parse_tooltips(table("Country,Paywall\nAustria,€3 per extract\n")).unwrap();
        let dataset = Dataset::new(Vec::new(), tooltips).unwrap();
        assert_eq!(dataset.tooltip("Austria", "Paywall"), Some("€3 per extract"));
        assert_eq!(dataset.tooltip("Austria", "Data fields"), None);
        assert_eq!(dataset.tooltip("Belgium", "Paywall"), None);
    }
}
