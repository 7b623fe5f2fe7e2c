#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-feature map interaction for the LISA result map.
//!
//! The map itself is abstracted behind [`MapSurface`]; the
//! [`InteractionController`] decides what to paint, what to report to the
//! info panel, and where to zoom.

pub mod bounds;
pub mod controller;
pub mod label;
pub mod style;

pub use bounds::feature_bounds;
pub use controller::{FeatureId, InfoReadout, InteractionController};
pub use label::{LABEL_FALLBACK_KEYS, label_for};
pub use style::FeatureStyle;

/// The rendering surface the controller drives.
pub trait MapSurface {
    /// Applies `style` to feature `id`.
    fn set_feature_style(&mut self, id: FeatureId, style: &FeatureStyle);

    /// Draws feature `id` above its neighbours.
    fn bring_to_front(&mut self, id: FeatureId);

    /// Moves the viewport to show `bounds`.
    fn fit_bounds(&mut self, bounds: geo::Rect<f64>);

    /// Replaces the info panel contents.
    fn show_info(&mut self, info: &InfoReadout);
}
