//! Legend segments that mirror the classifier's buckets.
//!
//! Segments are ordered ascending and are half-open `[from, to)`, except
//! the last one which also includes `to`. For every value in a segment,
//! [`DivergingClassifier::color_for`](crate::DivergingClassifier::color_for)
//! returns that segment's color.

use lisa_map_choropleth_models::{Color, LegendSegment, Palette, PaletteSet};

/// Builds the legend for the domain `[min, max]`.
///
/// Returns an empty legend for non-finite bounds. A single-valued domain
/// produces one zero-width segment in the sign's terminal color. When the
/// domain ends exactly at zero from below, a zero-width `[0, 0]` segment
/// closes the legend, because zero itself is painted from the positive
/// side.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn build_legend(palettes: &PaletteSet, min: f64, max: f64) -> Vec<LegendSegment> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    if min == max {
        return vec![LegendSegment {
            color: palettes.terminal_for(min).clone(),
            from: min,
            to: max,
        }];
    }

    let mut segments = Vec::with_capacity(palettes.negative.len() + palettes.positive.len());

    if min < 0.0 {
        let neg_end = max.min(0.0);
        if neg_end > min {
            push_steps(&mut segments, &palettes.negative, min, neg_end);
        }
        if max == 0.0 {
            segments.push(LegendSegment {
                color: palettes.positive_terminal().clone(),
                from: 0.0,
                to: 0.0,
            });
        }
    }

    if max > 0.0 {
        let pos_start = min.max(0.0);
        let pos_end = max.max(pos_start);
        if pos_end > pos_start {
            push_steps(&mut segments, &palettes.positive, pos_start, pos_end);
        }
    }

    segments
}

/// Splits `[start, end]` into one equal-width segment per palette color.
/// The last segment ends exactly at `end`.
#[allow(clippy::cast_precision_loss)]
fn push_steps(segments: &mut Vec<LegendSegment>, palette: &Palette, start: f64, end: f64) {
    let steps = palette.len();
    let width = (end - start) / steps as f64;
    for (i, color) in palette.iter().enumerate() {
        let from = (i as f64).mul_add(width, start);
        let to = if i + 1 == steps {
            end
        } else {
            ((i + 1) as f64).mul_add(width, start)
        };
        segments.push(LegendSegment {
            color: color.clone(),
            from,
            to,
        });
    }
}

/// Finds the segment covering `value`, using the same half-open rule the
/// legend is drawn with.
#[must_use]
pub fn segment_for(segments: &[LegendSegment], value: f64) -> Option<&LegendSegment> {
    let last = segments.len().checked_sub(1)?;
    segments.iter().enumerate().find_map(|(i, segment)| {
        let inside = if i == last {
            value >= segment.from && value <= segment.to
        } else {
            value >= segment.from && value < segment.to
        };
        inside.then_some(segment)
    })
}

/// Colors of a legend, in order.
#[must_use]
pub fn legend_colors(segments: &[LegendSegment]) -> Vec<&Color> {
    segments.iter().map(|s| &s.color).collect()
}
