#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Validation, state transitions, and wire serialization for spatial
//! analysis configurations.
//!
//! All functions here are pure. [`validate`] reports every problem at
//! once, [`reduce`] applies one user edit and clears fields that stopped
//! applying, and [`to_form_params`] produces the URL-encoded form the
//! analysis service expects.

pub mod display;
pub mod serialize;
pub mod transition;
pub mod validate;

pub use display::display_column;
pub use lisa_map_analysis_models::{
    AdminLevel, AnalysisConfig, ConfigField, JoinMethod, ValidationErrors, WeightsType,
};
pub use serialize::{parse_k, to_form_params};
pub use transition::{ConfigAction, clear_inapplicable, reduce};
pub use validate::{can_run, validate};
