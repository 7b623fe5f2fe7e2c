//! Field-level validation of an [`AnalysisConfig`].

use lisa_map_analysis_models::{
    ALPHA_RANGE, AdminLevel, AnalysisConfig, ConfigField, PERMUTATION_CHOICES, SIMPLIFY_TOL_RANGE,
    ValidationErrors, WeightsType,
};

use crate::serialize::parse_k;

/// Validates `config` for the selected dataset.
///
/// Every rule is evaluated; nothing short-circuits, so the caller can
/// show all problems at once. When `available_columns` is non-empty,
/// column fields must also name one of those columns.
#[must_use]
pub fn validate(
    config: &AnalysisConfig,
    dataset_id: Option<&str>,
    available_columns: &[String],
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if dataset_id.is_none_or(|id| id.trim().is_empty()) {
        errors.add(ConfigField::Dataset, "Choose a dataset.");
    }

    if is_blank(&config.variable) {
        errors.add(
            ConfigField::Variable,
            "Choose a numeric column to analyze.",
        );
    }

    for field in ConfigField::JOIN_FIELDS {
        if field.required_for(config.join_by, config.level)
            && config.text(field).is_none_or(is_blank)
        {
            errors.add(field, required_message(field, config.level));
        }
    }

    if config.wtype == WeightsType::Knn && parse_k(&config.k).is_none() {
        errors.add(ConfigField::K, "k is required for kNN.");
    }

    if !PERMUTATION_CHOICES.contains(&config.perm) {
        errors.add(
            ConfigField::Perm,
            format!(
                "Permutations must be one of {}.",
                PERMUTATION_CHOICES.map(|p| p.to_string()).join(", ")
            ),
        );
    }

    if !in_range(config.alpha, ALPHA_RANGE) {
        errors.add(
            ConfigField::Alpha,
            format!(
                "Significance level must be between {} and {}.",
                ALPHA_RANGE.0, ALPHA_RANGE.1
            ),
        );
    }

    if !in_range(config.simplify_tol, SIMPLIFY_TOL_RANGE) {
        errors.add(
            ConfigField::SimplifyTol,
            format!(
                "Simplification tolerance must be between {} and {}.",
                SIMPLIFY_TOL_RANGE.0, SIMPLIFY_TOL_RANGE.1
            ),
        );
    }

    if !available_columns.is_empty() {
        for field in ConfigField::COLUMN_FIELDS {
            if !config.applies(field) {
                continue;
            }
            let Some(column) = config.text(field).filter(|c| !is_blank(c)) else {
                continue;
            };
            if !available_columns.iter().any(|c| c == column) {
                errors.add(
                    field,
                    format!("Column '{column}' is not in the selected dataset."),
                );
            }
        }
    }

    errors
}

/// Whether the configuration can be submitted.
#[must_use]
pub fn can_run(
    config: &AnalysisConfig,
    dataset_id: Option<&str>,
    available_columns: &[String],
) -> bool {
    validate(config, dataset_id, available_columns).is_empty()
}

fn required_message(field: ConfigField, level: AdminLevel) -> String {
    match field {
        ConfigField::JoinKey => "Select a join key column.".to_string(),
        ConfigField::CountryCol => format!("Country column is required for {level}."),
        ConfigField::StateCol => format!("State column is required for {level}."),
        ConfigField::CountyCol => "County/District column is required.".to_string(),
        ConfigField::LonCol => "Longitude column is required.".to_string(),
        ConfigField::LatCol => "Latitude column is required.".to_string(),
        other => format!("{other} is required."),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value.is_finite() && value >= lo && value <= hi
}
