//! Sign-aware color classification.

use lisa_map_choropleth_models::{AttributeDomain, Color, LegendSegment, Palette, PaletteSet};
use serde_json::Value;

use crate::extent::feature_value;
use crate::legend;

/// Upper bound on the bucket ratio. Keeps the domain maximum in the last
/// bucket instead of one past the end of the palette.
pub const MAX_RATIO: f64 = 0.999_999;

/// Maps values to colors on a scale split at zero.
#[derive(Debug, Clone, Default)]
pub struct DivergingClassifier {
    palettes: PaletteSet,
}

impl DivergingClassifier {
    /// Creates a classifier over the given palettes.
    #[must_use]
    pub const fn new(palettes: PaletteSet) -> Self {
        Self { palettes }
    }

    /// The palettes this classifier paints with.
    #[must_use]
    pub const fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    /// Classifies `value` within the domain `[min, max]`.
    ///
    /// Non-finite input yields the default color. A single-valued domain
    /// yields the positive terminal color for `value >= 0` and the
    /// negative terminal color otherwise.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> &Color {
        if !value.is_finite() || !min.is_finite() || !max.is_finite() {
            return &self.palettes.default_color;
        }

        if min == max {
            return self.palettes.terminal_for(value);
        }

        if value < 0.0 && min < 0.0 {
            let neg_end = max.min(0.0);
            if neg_end > min {
                return self.pick(&self.palettes.negative, value, min, neg_end);
            }
        }

        let pos_start = min.max(0.0);
        let pos_end = max.max(pos_start);
        self.pick(
            &self.palettes.positive,
            value.max(pos_start),
            pos_start,
            pos_end,
        )
    }

    /// Classifies `value` within `domain`.
    #[must_use]
    pub fn color_in(&self, value: f64, domain: AttributeDomain) -> &Color {
        self.color_for(value, domain.min, domain.max)
    }

    /// Classifies a feature's `attribute`, falling back to the default
    /// color when the property does not coerce to a number.
    #[must_use]
    pub fn color_for_feature(
        &self,
        feature: &Value,
        attribute: &str,
        domain: AttributeDomain,
    ) -> &Color {
        feature_value(feature, attribute).map_or(&self.palettes.default_color, |v| {
            self.color_in(v, domain)
        })
    }

    /// Legend segments for `domain`, matching [`Self::color_for`].
    #[must_use]
    pub fn legend(&self, domain: AttributeDomain) -> Vec<LegendSegment> {
        legend::build_legend(&self.palettes, domain.min, domain.max)
    }

    /// Whether `color` can be produced by this classifier.
    #[must_use]
    pub fn is_known_color(&self, color: &Color) -> bool {
        self.palettes.positive.contains(color)
            || self.palettes.negative.contains(color)
            || *color == self.palettes.default_color
    }

    fn pick<'a>(&'a self, palette: &'a Palette, value: f64, start: f64, end: f64) -> &'a Color {
        let fallback = palette.last().unwrap_or(&self.palettes.default_color);
        bucket_index(value, start, end, palette.len())
            .and_then(|idx| palette.get(idx))
            .unwrap_or(fallback)
    }
}

/// Index of the bucket `value` falls in when `[start, end)` is split
/// into `steps` equal buckets.
///
/// Returns `None` for an empty or non-finite range, or when `steps` is
/// zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bucket_index(value: f64, start: f64, end: f64, steps: usize) -> Option<usize> {
    let range = end - start;
    if steps == 0 || !range.is_finite() || range <= 0.0 {
        return None;
    }
    let ratio = ((value - start) / range).clamp(0.0, MAX_RATIO);
    Some((ratio * steps as f64).floor() as usize)
}
