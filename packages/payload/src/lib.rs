#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalization and summaries of analysis result payloads.
//!
//! The analysis service (and its cache endpoint) may answer with a single
//! `FeatureCollection`, an array of them, or something unusable. Everything
//! downstream works on one canonical [`FeatureCollection`], produced here.

pub mod normalize;
pub mod stats;

pub use lisa_map_payload_models::{ClusterSummary, FeatureCollection};
pub use normalize::{normalize, normalize_str};
pub use stats::cluster_summary;
