#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response types for the LISA analysis service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An uploaded dataset as listed by `GET /list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    /// Dataset identifier. The service sends either a number or a string.
    #[serde(deserialize_with = "id_from_value")]
    pub id: String,
    /// Original upload file name.
    #[serde(default)]
    pub file_name: String,
    /// Any other fields the service includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn id_from_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "dataset id must be a string or number, got {other}"
        ))),
    }
}

/// Extracts column names from a headers response.
///
/// Accepts `{"columns": [...]}`, `{"headers": [...]}`, or a bare array.
/// Non-string entries are skipped and anything else yields no columns.
#[must_use]
pub fn parse_headers(body: &Value) -> Vec<String> {
    let list = match body {
        Value::Array(items) => Some(items),
        Value::Object(object) => object
            .get("columns")
            .or_else(|| object.get("headers"))
            .and_then(Value::as_array),
        _ => None,
    };

    let Some(list) = list else {
        log::warn!("Unrecognised headers response shape");
        return Vec::new();
    };

    list.iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
