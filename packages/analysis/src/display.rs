//! Property used to label features in the result map.

use lisa_map_analysis_models::{AdminLevel, AnalysisConfig, JoinMethod};

/// The result property used to label features for this configuration.
///
/// Falls back to a conventional property name when the join column is
/// unset.
#[must_use]
pub fn display_column(config: &AnalysisConfig) -> String {
    let (column, fallback) = match (config.join_by, config.level) {
        (JoinMethod::Name, AdminLevel::Adm2) => (config.county_col.as_str(), "county"),
        (JoinMethod::Name, AdminLevel::Adm1) => (config.state_col.as_str(), "state"),
        (JoinMethod::Name, AdminLevel::Adm0) => (config.country_col.as_str(), "country"),
        (JoinMethod::Code, _) => (config.join_key.as_str(), "code"),
        (JoinMethod::Point, _) => (
            [&config.county_col, &config.state_col, &config.country_col]
                .into_iter()
                .map(String::as_str)
                .find(|c| !c.trim().is_empty())
                .unwrap_or_default(),
            "name",
        ),
    };

    if column.trim().is_empty() {
        fallback.to_string()
    } else {
        column.to_string()
    }
}
