//! Path styles for rendered features.

use lisa_map_choropleth::Color;
use serde::{Deserialize, Serialize};

const BASE_STROKE: &str = "#888";
const HIGHLIGHT_STROKE: &str = "#222";

/// Style options for one rendered feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: Color,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub dash_array: String,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    /// The resting style for a feature painted `fill`.
    #[must_use]
    pub fn base(fill: Color) -> Self {
        Self {
            fill_color: fill,
            color: BASE_STROKE.to_string(),
            weight: 1.0,
            opacity: 1.0,
            dash_array: "2".to_string(),
            fill_opacity: 0.25,
        }
    }

    /// This style with the hover override applied. The fill color is
    /// kept.
    #[must_use]
    pub fn highlighted(&self) -> Self {
        Self {
            fill_color: self.fill_color.clone(),
            color: HIGHLIGHT_STROKE.to_string(),
            weight: 3.0,
            opacity: self.opacity,
            dash_array: String::new(),
            fill_opacity: 0.6,
        }
    }
}
