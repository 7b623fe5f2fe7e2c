#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Diverging choropleth classification for the LISA result map.
//!
//! The pipeline is: [`extent::compute_extent`] finds the finite range of
//! the selected attribute, [`DivergingClassifier`] turns each value into
//! a color, and [`legend::build_legend`] produces segments whose bounds
//! are the classifier's own bucket bounds, so the legend always agrees
//! with the paint.
//!
//! The range is split at zero. Negative values are quantized over
//! `[min, min(max, 0))` with the negative palette and everything else
//! over `[max(min, 0), max]` with the positive palette, each side with
//! its own step count.

pub mod classify;
pub mod extent;
pub mod format;
pub mod legend;

pub use classify::DivergingClassifier;
pub use extent::{coerce_number, compute_extent};
pub use legend::build_legend;
pub use lisa_map_choropleth_models::{
    AttributeDomain, Color, LegendSegment, Palette, PaletteError, PaletteSet,
};
