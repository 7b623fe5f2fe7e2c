#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical `GeoJSON` feature collection and result summary types.
//!
//! The analysis service returns plain `GeoJSON`. Features are kept as raw
//! `serde_json::Value`s so that geometry stays opaque and property values
//! of any shape survive untouched; nothing in the pipeline mutates them.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// The `type` tag of a `GeoJSON` feature collection.
pub const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";

/// A `FeatureCollection` in canonical form.
///
/// `features` is always an array. Every other top-level member of the
/// source object (`crs`, `bbox`, `name`, attribution, ...) is carried
/// through unchanged in `members`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// The collection's features, in order.
    pub features: Vec<Value>,
    /// Top-level members other than `type` and `features`.
    pub members: Map<String, Value>,
}

impl FeatureCollection {
    /// Creates a collection holding only `features`.
    #[must_use]
    pub fn new(features: Vec<Value>) -> Self {
        Self {
            features,
            members: Map::new(),
        }
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Renders the collection back to a `GeoJSON` object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.members.clone();
        object.insert(
            "type".to_string(),
            Value::String(FEATURE_COLLECTION_TYPE.to_string()),
        );
        object.insert("features".to_string(), Value::Array(self.features.clone()));
        Value::Object(object)
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Returns a feature's `properties` object, if it has one.
#[must_use]
pub fn feature_properties(feature: &Value) -> Option<&Map<String, Value>> {
    feature.get("properties").and_then(Value::as_object)
}

/// Returns one property of a feature.
#[must_use]
pub fn feature_property<'a>(feature: &'a Value, key: &str) -> Option<&'a Value> {
    feature_properties(feature).and_then(|props| props.get(key))
}

/// Returns a feature's `geometry`, ignoring `null`.
#[must_use]
pub fn feature_geometry(feature: &Value) -> Option<&Value> {
    feature.get("geometry").filter(|g| !g.is_null())
}

/// Count of features per LISA cluster label.
///
/// `ns` counts everything that is not one of the four significant
/// labels (not significant, missing, or unrecognised).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Total number of features.
    pub total: usize,
    /// High-high clusters.
    #[serde(rename = "HH")]
    pub high_high: usize,
    /// Low-low clusters.
    #[serde(rename = "LL")]
    pub low_low: usize,
    /// High-low outliers.
    #[serde(rename = "HL")]
    pub high_low: usize,
    /// Low-high outliers.
    #[serde(rename = "LH")]
    pub low_high: usize,
    /// Not significant.
    pub ns: usize,
}
