#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial analysis configuration types.
//!
//! An [`AnalysisConfig`] describes how the rows of an uploaded dataset are
//! joined to administrative boundaries (by code, by name, or by point
//! coordinates at country, state, or county level) and which spatial
//! weights and significance settings the analysis service should use.
//! Which join fields apply depends on the join method and level; see
//! [`ConfigField::applies_to`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Permutation counts offered for the significance test.
pub const PERMUTATION_CHOICES: [u32; 3] = [199, 499, 999];

/// Accepted significance levels (inclusive).
pub const ALPHA_RANGE: (f64, f64) = (0.001, 0.2);

/// Accepted polygon simplification tolerances (inclusive).
pub const SIMPLIFY_TOL_RANGE: (f64, f64) = (0.0005, 0.12);

/// Administrative level the dataset is joined to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdminLevel {
    /// Countries.
    Adm0,
    /// States / provinces.
    Adm1,
    /// Counties / districts.
    #[default]
    Adm2,
}

impl AdminLevel {
    /// Suggested polygon simplification tolerance for this level.
    #[must_use]
    pub const fn default_simplify_tol(self) -> f64 {
        match self {
            Self::Adm0 => 0.08,
            Self::Adm1 => 0.015,
            Self::Adm2 => 0.01,
        }
    }
}

/// How dataset rows are matched to boundaries.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JoinMethod {
    /// By an administrative code column (ISO codes and similar).
    Code,
    /// By administrative name columns.
    #[default]
    Name,
    /// By longitude/latitude columns.
    Point,
}

/// Spatial weights definition passed to the analysis service.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightsType {
    /// Shared edges.
    #[default]
    Rook,
    /// Shared edges or vertices.
    Queen,
    /// `k` nearest neighbours.
    Knn,
}

/// A configuration field that can carry a validation error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ConfigField {
    /// The dataset selection (not part of [`AnalysisConfig`] itself).
    #[serde(rename = "file")]
    #[strum(serialize = "file")]
    Dataset,
    /// Target variable column.
    Variable,
    /// Code column for code joins.
    JoinKey,
    /// Country name column.
    CountryCol,
    /// State / province name column.
    StateCol,
    /// County / district name column.
    CountyCol,
    /// ISO3 country hint for county name joins.
    CountryIso3,
    /// Longitude column for point joins.
    LonCol,
    /// Latitude column for point joins.
    LatCol,
    /// Neighbour count for kNN weights.
    K,
    /// Permutation count.
    Perm,
    /// Significance level.
    Alpha,
    /// Polygon simplification tolerance.
    SimplifyTol,
}

impl ConfigField {
    /// Join fields that depend on the join method and level.
    pub const JOIN_FIELDS: [Self; 7] = [
        Self::JoinKey,
        Self::CountryCol,
        Self::StateCol,
        Self::CountyCol,
        Self::CountryIso3,
        Self::LonCol,
        Self::LatCol,
    ];

    /// Fields whose value names a dataset column.
    pub const COLUMN_FIELDS: [Self; 7] = [
        Self::Variable,
        Self::JoinKey,
        Self::CountryCol,
        Self::StateCol,
        Self::CountyCol,
        Self::LonCol,
        Self::LatCol,
    ];

    /// Whether this field is meaningful for the given combination.
    ///
    /// Fields that do not depend on the join (variable, weights and test
    /// parameters) always apply, except `k` which only applies to kNN.
    #[must_use]
    pub const fn applies_to(self, join_by: JoinMethod, level: AdminLevel, wtype: WeightsType) -> bool {
        match self {
            Self::JoinKey => matches!(join_by, JoinMethod::Code),
            Self::CountryCol => {
                matches!(join_by, JoinMethod::Name)
                    && matches!(level, AdminLevel::Adm0 | AdminLevel::Adm1)
            }
            Self::StateCol => {
                matches!(join_by, JoinMethod::Name)
                    && matches!(level, AdminLevel::Adm1 | AdminLevel::Adm2)
            }
            Self::CountyCol | Self::CountryIso3 => {
                matches!(join_by, JoinMethod::Name) && matches!(level, AdminLevel::Adm2)
            }
            Self::LonCol | Self::LatCol => matches!(join_by, JoinMethod::Point),
            Self::K => matches!(wtype, WeightsType::Knn),
            Self::Dataset | Self::Variable | Self::Perm | Self::Alpha | Self::SimplifyTol => true,
        }
    }

    /// Whether this join field must be filled in for the combination.
    ///
    /// For county name joins the state column and ISO3 code are optional
    /// hints.
    #[must_use]
    pub const fn required_for(self, join_by: JoinMethod, level: AdminLevel) -> bool {
        match self {
            Self::StateCol => {
                matches!(join_by, JoinMethod::Name) && matches!(level, AdminLevel::Adm1)
            }
            Self::CountryIso3 => false,
            Self::JoinKey
            | Self::CountryCol
            | Self::CountyCol
            | Self::LonCol
            | Self::LatCol => self.applies_to(join_by, level, WeightsType::Rook),
            Self::Dataset
            | Self::Variable
            | Self::K
            | Self::Perm
            | Self::Alpha
            | Self::SimplifyTol => false,
        }
    }
}

/// The user's analysis configuration for one dataset.
///
/// Column fields hold the chosen column name, or an empty string when
/// unset. `k` is kept as typed so that an unparseable entry can be
/// reported rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Administrative level.
    pub level: AdminLevel,
    /// Join method.
    pub join_by: JoinMethod,
    /// Numeric column to analyze.
    pub variable: String,
    /// Code column (code joins).
    pub join_key: String,
    /// Country name column (name joins at adm0/adm1).
    pub country_col: String,
    /// State name column (name joins at adm1, optional at adm2).
    pub state_col: String,
    /// County name column (name joins at adm2).
    pub county_col: String,
    /// ISO3 country hint (name joins at adm2, optional).
    pub country_iso3: String,
    /// Longitude column (point joins).
    pub lon_col: String,
    /// Latitude column (point joins).
    pub lat_col: String,
    /// Spatial weights.
    pub wtype: WeightsType,
    /// Neighbour count as entered (kNN only).
    pub k: String,
    /// Permutation count, one of [`PERMUTATION_CHOICES`].
    pub perm: u32,
    /// Significance level.
    pub alpha: f64,
    /// Polygon simplification tolerance.
    pub simplify_tol: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let level = AdminLevel::default();
        Self {
            level,
            join_by: JoinMethod::default(),
            variable: String::new(),
            join_key: String::new(),
            country_col: String::new(),
            state_col: String::new(),
            county_col: String::new(),
            country_iso3: String::new(),
            lon_col: String::new(),
            lat_col: String::new(),
            wtype: WeightsType::default(),
            k: String::new(),
            perm: 999,
            alpha: 0.05,
            simplify_tol: level.default_simplify_tol(),
        }
    }
}

impl AnalysisConfig {
    /// The text value of a string-valued field, or `None` for fields that
    /// are not strings.
    #[must_use]
    pub fn text(&self, field: ConfigField) -> Option<&str> {
        let value = match field {
            ConfigField::Variable => &self.variable,
            ConfigField::JoinKey => &self.join_key,
            ConfigField::CountryCol => &self.country_col,
            ConfigField::StateCol => &self.state_col,
            ConfigField::CountyCol => &self.county_col,
            ConfigField::CountryIso3 => &self.country_iso3,
            ConfigField::LonCol => &self.lon_col,
            ConfigField::LatCol => &self.lat_col,
            ConfigField::K => &self.k,
            ConfigField::Dataset
            | ConfigField::Perm
            | ConfigField::Alpha
            | ConfigField::SimplifyTol => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to a string-valued field.
    pub fn text_mut(&mut self, field: ConfigField) -> Option<&mut String> {
        let value = match field {
            ConfigField::Variable => &mut self.variable,
            ConfigField::JoinKey => &mut self.join_key,
            ConfigField::CountryCol => &mut self.country_col,
            ConfigField::StateCol => &mut self.state_col,
            ConfigField::CountyCol => &mut self.county_col,
            ConfigField::CountryIso3 => &mut self.country_iso3,
            ConfigField::LonCol => &mut self.lon_col,
            ConfigField::LatCol => &mut self.lat_col,
            ConfigField::K => &mut self.k,
            ConfigField::Dataset
            | ConfigField::Perm
            | ConfigField::Alpha
            | ConfigField::SimplifyTol => return None,
        };
        Some(value)
    }

    /// Whether `field` applies to this configuration's join and weights.
    #[must_use]
    pub const fn applies(&self, field: ConfigField) -> bool {
        field.applies_to(self.join_by, self.level, self.wtype)
    }
}

/// Field-scoped validation messages.
///
/// Recomputed from scratch on every change and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<ConfigField, String>);

impl ValidationErrors {
    /// An empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records `message` for `field`, keeping the first message if one
    /// is already present.
    pub fn add(&mut self, field: ConfigField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: ConfigField) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Normalizes common country aliases to ISO3 (`"us"` -> `"USA"`,
/// `"UK"` -> `"GBR"`). Unknown codes are returned trimmed and upper-cased.
#[must_use]
pub fn normalize_iso3(value: &str) -> String {
    let code = value.trim().to_uppercase();
    match code.as_str() {
        "US" | "USA" => "USA".to_string(),
        "UK" | "GB" | "GBR" => "GBR".to_string(),
        "MY" => "MYS".to_string(),
        "IN" => "IND".to_string(),
        "SG" => "SGP".to_string(),
        "AU" => "AUS".to_string(),
        "CA" => "CAN".to_string(),
        _ => code,
    }
}
