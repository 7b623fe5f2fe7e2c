//! User edits to an [`AnalysisConfig`].
//!
//! Every edit goes through [`reduce`], which leaves every field that no
//! longer applies to the join method, level, or weights empty.

use lisa_map_analysis_models::{AdminLevel, AnalysisConfig, ConfigField, JoinMethod, WeightsType};

/// A single edit to the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Change the administrative level.
    SetLevel(AdminLevel),
    /// Change the join method.
    SetJoinBy(JoinMethod),
    /// Change the spatial weights.
    SetWeights(WeightsType),
    /// Set a string-valued field. Ignored when the field does not apply.
    SetText(ConfigField, String),
    /// Set the permutation count.
    SetPerm(u32),
    /// Set the significance level.
    SetAlpha(f64),
    /// Set the simplification tolerance.
    SetSimplifyTol(f64),
    /// Replace the whole configuration, as when loading a saved one.
    Load(Box<AnalysisConfig>),
    /// Start over with defaults, as when a different dataset is chosen.
    Reset,
}

/// Applies `action` to `config`.
#[must_use]
pub fn reduce(mut config: AnalysisConfig, action: ConfigAction) -> AnalysisConfig {
    match action {
        ConfigAction::SetLevel(level) => config.level = level,
        ConfigAction::SetJoinBy(join_by) => config.join_by = join_by,
        ConfigAction::SetWeights(wtype) => config.wtype = wtype,
        ConfigAction::SetText(field, value) => {
            if config.applies(field) {
                if let Some(slot) = config.text_mut(field) {
                    *slot = value;
                }
            } else {
                log::debug!(
                    "Ignoring {field} for {}/{} join",
                    config.join_by,
                    config.level
                );
            }
        }
        ConfigAction::SetPerm(perm) => config.perm = perm,
        ConfigAction::SetAlpha(alpha) => config.alpha = alpha,
        ConfigAction::SetSimplifyTol(tol) => config.simplify_tol = tol,
        ConfigAction::Load(loaded) => config = *loaded,
        ConfigAction::Reset => return AnalysisConfig::default(),
    }

    clear_inapplicable(&mut config);
    config
}

/// Empties every join field and `k` that does not apply to the current
/// join method, level, and weights.
pub fn clear_inapplicable(config: &mut AnalysisConfig) {
    for field in ConfigField::JOIN_FIELDS.into_iter().chain([ConfigField::K]) {
        if config.applies(field) {
            continue;
        }
        if let Some(slot) = config.text_mut(field)
            && !slot.is_empty()
        {
            log::debug!("Clearing {field} ('{slot}')");
            slot.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn filled() -> AnalysisConfig {
        let mut config = AnalysisConfig {
            variable: "rate".to_string(),
            ..AnalysisConfig::default()
        };
        for field in ConfigField::JOIN_FIELDS.into_iter().chain([ConfigField::K]) {
            if let Some(slot) = config.text_mut(field) {
                *slot = format!("{field}-value");
            }
        }
        config
    }

    fn assert_only_applicable(config: &AnalysisConfig) {
        for field in ConfigField::JOIN_FIELDS.into_iter().chain([ConfigField::K]) {
            if !config.applies(field) {
                assert_eq!(
                    config.text(field),
                    Some(""),
                    "{field} should be empty for {}/{}/{}",
                    config.join_by,
                    config.level,
                    config.wtype
                );
            }
        }
    }

    #[test]
    fn switching_to_code_join_keeps_only_join_key() {
        let config = reduce(filled(), ConfigAction::SetJoinBy(JoinMethod::Code));
        assert_eq!(config.join_key, "joinKey-value");
        assert_eq!(config.county_col, "");
        assert_eq!(config.state_col, "");
        assert_eq!(config.country_iso3, "");
        assert_eq!(config.lon_col, "");
        assert_eq!(config.variable, "rate");
    }

    #[test]
    fn switching_to_state_level_keeps_country_and_state() {
        let config = reduce(filled(), ConfigAction::SetLevel(AdminLevel::Adm1));
        assert_eq!(config.country_col, "countryCol-value");
        assert_eq!(config.state_col, "stateCol-value");
        assert_eq!(config.county_col, "");
        assert_eq!(config.country_iso3, "");
    }

    #[test]
    fn leaving_knn_clears_k() {
        let config = reduce(filled(), ConfigAction::SetWeights(WeightsType::Knn));
        let config = reduce(config, ConfigAction::SetText(ConfigField::K, "4".to_string()));
        assert_eq!(config.k, "4");
        let config = reduce(config, ConfigAction::SetWeights(WeightsType::Queen));
        assert_eq!(config.k, "");
    }

    #[test]
    fn inapplicable_text_is_ignored() {
        let config = reduce(
            AnalysisConfig::default(),
            ConfigAction::SetText(ConfigField::LonCol, "lon".to_string()),
        );
        assert_eq!(config.lon_col, "");
        let config = reduce(
            config,
            ConfigAction::SetText(ConfigField::CountyCol, "county".to_string()),
        );
        assert_eq!(config.county_col, "county");
    }

    #[test]
    fn level_change_does_not_reset_simplify_tolerance() {
        let config = reduce(AnalysisConfig::default(), ConfigAction::SetSimplifyTol(0.05));
        let config = reduce(config, ConfigAction::SetLevel(AdminLevel::Adm0));
        assert!((config.simplify_tol - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn loaded_config_is_cleaned() {
        let loaded = AnalysisConfig {
            join_by: JoinMethod::Point,
            ..filled()
        };
        let config = reduce(AnalysisConfig::default(), ConfigAction::Load(Box::new(loaded)));
        assert_eq!(config.lon_col, "lonCol-value");
        assert_eq!(config.county_col, "");
        assert_eq!(config.k, "");
    }

    #[test]
    fn reset_restores_defaults() {
        let config = reduce(filled(), ConfigAction::Reset);
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn every_transition_clears_inapplicable_fields() {
        for level in AdminLevel::iter() {
            for join_by in JoinMethod::iter() {
                for wtype in WeightsType::iter() {
                    let actions = [
                        ConfigAction::SetLevel(level),
                        ConfigAction::SetJoinBy(join_by),
                        ConfigAction::SetWeights(wtype),
                    ];
                    for action in actions {
                        let config = reduce(filled(), action);
                        assert_only_applicable(&config);
                    }

                    let mut config = filled();
                    config = reduce(config, ConfigAction::SetJoinBy(join_by));
                    config = reduce(config, ConfigAction::SetLevel(level));
                    config = reduce(config, ConfigAction::SetWeights(wtype));
                    assert_only_applicable(&config);

                    for field in ConfigField::iter() {
                        let edited = reduce(
                            config.clone(),
                            ConfigAction::SetText(field, "x".to_string()),
                        );
                        assert_only_applicable(&edited);
                    }
                }
            }
        }
    }
}
