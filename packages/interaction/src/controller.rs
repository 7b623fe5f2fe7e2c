//! Hover, highlight, and click-to-zoom for a classified result map.

use std::fmt;

use lisa_map_choropleth::{
    AttributeDomain, DivergingClassifier, LegendSegment, compute_extent, extent::feature_value,
    format::MISSING,
};
use lisa_map_payload_models::{FeatureCollection, feature_properties};
use serde::Serialize;

use crate::{FeatureStyle, MapSurface, bounds::feature_bounds, label::label_for};

/// Index of a feature within the controller's collection.
pub type FeatureId = usize;

/// What the info panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InfoReadout {
    /// Nothing is hovered.
    Prompt,
    /// A hovered feature.
    Feature {
        title: String,
        label: String,
        value: String,
    },
}

impl fmt::Display for InfoReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt => f.write_str("Hover over a region"),
            Self::Feature {
                title,
                label,
                value,
            } => write!(f, "{title}\n{label}: {value}"),
        }
    }
}

/// Drives per-feature styling and interaction for one result collection.
///
/// Styles are always recomputed from the classifier and the current
/// domain; the controller never caches a feature's previous style.
#[derive(Debug)]
pub struct InteractionController {
    classifier: DivergingClassifier,
    collection: FeatureCollection,
    variable: String,
    label_key: Option<String>,
    domain: AttributeDomain,
    hovered: Option<FeatureId>,
}

impl InteractionController {
    /// Creates a controller classifying `variable` over `collection`'s
    /// own extent.
    #[must_use]
    pub fn new(
        classifier: DivergingClassifier,
        collection: FeatureCollection,
        variable: impl Into<String>,
        label_key: Option<String>,
    ) -> Self {
        let variable = variable.into();
        let domain = compute_extent(&collection, &variable);
        Self {
            classifier,
            collection,
            variable,
            label_key,
            domain,
            hovered: None,
        }
    }

    #[must_use]
    pub const fn domain(&self) -> AttributeDomain {
        self.domain
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    #[must_use]
    pub const fn hovered(&self) -> Option<FeatureId> {
        self.hovered
    }

    #[must_use]
    pub const fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Legend segments for the current domain.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendSegment> {
        self.classifier.legend(self.domain)
    }

    /// The resting style for feature `id`.
    #[must_use]
    pub fn style_for(&self, id: FeatureId) -> Option<FeatureStyle> {
        let feature = self.collection.features.get(id)?;
        let fill = self
            .classifier
            .color_for_feature(feature, &self.variable, self.domain)
            .clone();
        Some(FeatureStyle::base(fill))
    }

    /// The info panel contents for feature `id`.
    #[must_use]
    pub fn info_for(&self, id: FeatureId) -> InfoReadout {
        let Some(feature) = self.collection.features.get(id) else {
            return InfoReadout::Prompt;
        };
        let value = feature_value(feature, &self.variable)
            .map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"));
        InfoReadout::Feature {
            title: self.variable.clone(),
            label: label_for(feature_properties(feature), self.label_key.as_deref()),
            value,
        }
    }

    /// Paints every feature and resets the info panel.
    pub fn render(&self, surface: &mut impl MapSurface) {
        for id in 0..self.collection.len() {
            self.restyle(id, surface);
        }
        if let Some(id) = self.hovered {
            self.highlight(id, surface);
        }
        surface.show_info(&self.hovered.map_or(InfoReadout::Prompt, |id| self.info_for(id)));
        log::debug!(
            "Rendered {} features for '{}' over [{}, {}]",
            self.collection.len(),
            self.variable,
            self.domain.min,
            self.domain.max
        );
    }

    /// Applies the highlight override to `id` and reports it to the info
    /// panel. Returns `false` for an unknown feature.
    pub fn on_hover(&mut self, id: FeatureId, surface: &mut impl MapSurface) -> bool {
        if id >= self.collection.len() {
            return false;
        }
        if let Some(previous) = self.hovered.replace(id)
            && previous != id
        {
            self.restyle(previous, surface);
        }
        self.highlight(id, surface);
        surface.show_info(&self.info_for(id));
        true
    }

    /// Restores `id` to the style the current domain produces.
    pub fn on_hover_end(&mut self, id: FeatureId, surface: &mut impl MapSurface) {
        self.restyle(id, surface);
        if self.hovered == Some(id) {
            self.hovered = None;
            surface.show_info(&InfoReadout::Prompt);
        }
    }

    /// Zooms to `id`. Returns `false` when the feature has no usable
    /// geometry.
    pub fn on_click(&self, id: FeatureId, surface: &mut impl MapSurface) -> bool {
        let Some(bounds) = self.collection.features.get(id).and_then(feature_bounds) else {
            log::debug!("Feature {id} has no bounds to zoom to");
            return false;
        };
        surface.fit_bounds(bounds);
        true
    }

    /// Replaces the domain and repaints.
    pub fn set_domain(&mut self, domain: AttributeDomain, surface: &mut impl MapSurface) {
        self.domain = domain;
        self.render(surface);
    }

    /// Switches the classified attribute, recomputing its extent.
    pub fn set_variable(&mut self, variable: impl Into<String>, surface: &mut impl MapSurface) {
        self.variable = variable.into();
        self.domain = compute_extent(&self.collection, &self.variable);
        self.render(surface);
    }

    fn restyle(&self, id: FeatureId, surface: &mut impl MapSurface) {
        if let Some(style) = self.style_for(id) {
            surface.set_feature_style(id, &style);
        }
    }

    fn highlight(&self, id: FeatureId, surface: &mut impl MapSurface) {
        if let Some(style) = self.style_for(id) {
            surface.set_feature_style(id, &style.highlighted());
            surface.bring_to_front(id);
        }
    }
}
