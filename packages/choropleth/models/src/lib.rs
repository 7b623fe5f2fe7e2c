#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Palette, domain, and legend types for choropleth classification.
//!
//! Palettes are plain configuration: the default set is embedded at
//! compile time from `palettes/default.toml`, and callers can load any
//! other set from TOML so the classifier and legend stay testable with
//! arbitrary colors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded default palette definition.
const DEFAULT_PALETTES_TOML: &str = include_str!("../palettes/default.toml");

/// A color token as understood by the map renderer (e.g. `"#f2fdaa"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wraps a color token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw color token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An ordered, fixed-length sequence of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Color>);

impl Palette {
    /// Builds a palette from color tokens, in order.
    #[must_use]
    pub fn new<I, C>(colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        Self(colors.into_iter().map(Into::into).collect())
    }

    /// Number of steps in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Color> {
        self.0.get(index)
    }

    /// First color of the palette.
    #[must_use]
    pub fn first(&self) -> Option<&Color> {
        self.0.first()
    }

    /// Last color of the palette.
    #[must_use]
    pub fn last(&self) -> Option<&Color> {
        self.0.last()
    }

    /// Iterates the colors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.0.iter()
    }

    /// Whether `color` is one of this palette's colors.
    #[must_use]
    pub fn contains(&self, color: &Color) -> bool {
        self.0.contains(color)
    }
}

/// Errors raised while loading a palette definition.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse palette definition: {0}")]
    Toml(#[from] toml::de::Error),

    /// One of the palettes has no colors.
    #[error("Palette '{name}' must contain at least one color")]
    Empty {
        /// Which palette was empty (`"positive"` or `"negative"`).
        name: &'static str,
    },
}

/// The pair of palettes used by the diverging scale plus the fallback
/// color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSet {
    /// Colors for values at or above the zero crossing, low to high.
    pub positive: Palette,
    /// Colors for values below zero, most negative first.
    pub negative: Palette,
    /// Painted whenever a value cannot be classified.
    pub default_color: Color,
}

impl PaletteSet {
    /// Parses and checks a palette set from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError`] if the document is malformed or either
    /// palette is empty.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PaletteError> {
        let set: Self = toml::de::from_str(toml_str)?;
        if set.positive.is_empty() {
            return Err(PaletteError::Empty { name: "positive" });
        }
        if set.negative.is_empty() {
            return Err(PaletteError::Empty { name: "negative" });
        }
        Ok(set)
    }

    /// Color for the top of the positive scale.
    #[must_use]
    pub fn positive_terminal(&self) -> &Color {
        self.positive.last().unwrap_or(&self.default_color)
    }

    /// Color for the bottom of the negative scale.
    #[must_use]
    pub fn negative_terminal(&self) -> &Color {
        self.negative.first().unwrap_or(&self.default_color)
    }

    /// Terminal color for a single-valued domain, picked by sign.
    #[must_use]
    pub fn terminal_for(&self, value: f64) -> &Color {
        if value >= 0.0 {
            self.positive_terminal()
        } else {
            self.negative_terminal()
        }
    }
}

impl Default for PaletteSet {
    /// The embedded default palette set.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by the tests.
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_PALETTES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default palettes: {e}"))
    }
}

/// The finite `[min, max]` range of a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeDomain {
    /// Smallest finite value.
    pub min: f64,
    /// Largest finite value.
    pub max: f64,
}

impl AttributeDomain {
    /// The domain reported when no finite values exist.
    pub const EMPTY: Self = Self { min: 0.0, max: 0.0 };

    /// Creates a domain from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the domain covers a single value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_single_valued(&self) -> bool {
        self.min == self.max
    }

    /// Whether both bounds are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl Default for AttributeDomain {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One legend entry: a color and the value range it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSegment {
    /// Color painted for values in this range.
    pub color: Color,
    /// Inclusive lower bound.
    pub from: f64,
    /// Upper bound (exclusive, except for the last segment of a legend).
    pub to: f64,
}
