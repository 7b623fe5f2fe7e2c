//! Analysis configuration from a file and command-line flags.

use std::path::{Path, PathBuf};

use clap::Args;
use lisa_map_analysis::ConfigAction;
use lisa_map_analysis_models::{AdminLevel, AnalysisConfig, ConfigField, JoinMethod, WeightsType};

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Saved configuration (`.toml` or `.json`); flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Administrative level (adm0, adm1, adm2)
    #[arg(long)]
    level: Option<AdminLevel>,
    /// Join method (code, name, point)
    #[arg(long)]
    join_by: Option<JoinMethod>,
    /// Numeric column to analyze
    #[arg(long)]
    variable: Option<String>,
    #[arg(long)]
    join_key: Option<String>,
    #[arg(long)]
    country_col: Option<String>,
    #[arg(long)]
    state_col: Option<String>,
    #[arg(long)]
    county_col: Option<String>,
    /// ISO3 country hint for county name joins (aliases like `US` accepted)
    #[arg(long)]
    country_iso3: Option<String>,
    #[arg(long)]
    lon_col: Option<String>,
    #[arg(long)]
    lat_col: Option<String>,
    /// Spatial weights (rook, queen, knn)
    #[arg(long)]
    wtype: Option<WeightsType>,
    /// Neighbour count for knn weights
    #[arg(long)]
    k: Option<String>,
    /// Permutations (199, 499, 999)
    #[arg(long)]
    perm: Option<u32>,
    /// Significance level
    #[arg(long)]
    alpha: Option<f64>,
    /// Polygon simplification tolerance (defaults by level)
    #[arg(long)]
    simplify_tol: Option<f64>,
}

impl ConfigArgs {
    /// The edits that turn a fresh configuration into the requested one.
    ///
    /// Selectors are applied before text fields so that every flag lands
    /// on a field that applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or
    /// parsed.
    pub fn into_actions(self) -> Result<Vec<ConfigAction>, Box<dyn std::error::Error>> {
        let mut actions = Vec::new();

        let loaded = match &self.config {
            Some(path) => {
                let config = load_config(path)?;
                actions.push(ConfigAction::Load(Box::new(config)));
                true
            }
            None => false,
        };

        if let Some(level) = self.level {
            actions.push(ConfigAction::SetLevel(level));
            if !loaded && self.simplify_tol.is_none() {
                actions.push(ConfigAction::SetSimplifyTol(level.default_simplify_tol()));
            }
        }
        if let Some(join_by) = self.join_by {
            actions.push(ConfigAction::SetJoinBy(join_by));
        }
        if let Some(wtype) = self.wtype {
            actions.push(ConfigAction::SetWeights(wtype));
        }

        let texts = [
            (ConfigField::Variable, self.variable),
            (ConfigField::JoinKey, self.join_key),
            (ConfigField::CountryCol, self.country_col),
            (ConfigField::StateCol, self.state_col),
            (ConfigField::CountyCol, self.county_col),
            (ConfigField::CountryIso3, self.country_iso3),
            (ConfigField::LonCol, self.lon_col),
            (ConfigField::LatCol, self.lat_col),
            (ConfigField::K, self.k),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                actions.push(ConfigAction::SetText(field, value));
            }
        }

        if let Some(perm) = self.perm {
            actions.push(ConfigAction::SetPerm(perm));
        }
        if let Some(alpha) = self.alpha {
            actions.push(ConfigAction::SetAlpha(alpha));
        }
        if let Some(tol) = self.simplify_tol {
            actions.push(ConfigAction::SetSimplifyTol(tol));
        }

        Ok(actions)
    }
}

fn load_config(path: &Path) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: AnalysisConfig = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };
    log::debug!("Loaded analysis configuration from {}", path.display());
    Ok(config)
}
