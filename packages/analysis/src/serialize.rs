//! Wire form for submitting an analysis run.

use lisa_map_analysis_models::{AdminLevel, AnalysisConfig, JoinMethod, WeightsType, normalize_iso3};

/// Parses a neighbour count as typed.
///
/// Accepts anything that reads as a finite number and truncates toward
/// zero, so `"8.7"` is `8`. Blank or non-numeric input is `None`.
#[must_use]
pub fn parse_k(value: &str) -> Option<i64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(parsed.trunc() as i64)
}

/// Builds the URL-encoded form fields for `config`.
///
/// Only the fields that apply to the join method and level are sent.
/// For county name joins the optional state column and ISO3 hint are
/// included only when set.
#[must_use]
pub fn to_form_params(config: &AnalysisConfig) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("level", config.level.to_string()),
        ("variable", config.variable.clone()),
        ("join_by", config.join_by.to_string()),
    ];

    match (config.join_by, config.level) {
        (JoinMethod::Code, _) => params.push(("join_key", config.join_key.clone())),
        (JoinMethod::Name, AdminLevel::Adm0) => {
            params.push(("country_col", config.country_col.clone()));
        }
        (JoinMethod::Name, AdminLevel::Adm1) => {
            params.push(("country_col", config.country_col.clone()));
            params.push(("state_col", config.state_col.clone()));
        }
        (JoinMethod::Name, AdminLevel::Adm2) => {
            params.push(("county_col", config.county_col.clone()));
            if !config.state_col.trim().is_empty() {
                params.push(("state_col", config.state_col.clone()));
            }
            let iso3 = normalize_iso3(&config.country_iso3);
            if !iso3.is_empty() {
                params.push(("country_iso3", iso3));
            }
        }
        (JoinMethod::Point, _) => {
            params.push(("lon_col", config.lon_col.clone()));
            params.push(("lat_col", config.lat_col.clone()));
        }
    }

    params.push(("wtype", config.wtype.to_string()));
    if config.wtype == WeightsType::Knn
        && let Some(k) = parse_k(&config.k)
    {
        params.push(("k", k.to_string()));
    }
    params.push(("perm", config.perm.to_string()));
    params.push(("alpha", config.alpha.to_string()));
    params.push(("simplify_tol", config.simplify_tol.to_string()));

    params
}
