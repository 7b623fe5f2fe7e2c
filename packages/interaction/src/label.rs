//! Human-readable feature labels.

use lisa_map_choropleth::format::MISSING;
use serde_json::{Map, Value};

/// Property keys tried, in order, after the caller's preferred key.
pub const LABEL_FALLBACK_KEYS: [&str; 16] = [
    "county",
    "County",
    "name",
    "NAME",
    "Name",
    "shapeName",
    "ShapeName",
    "shape_name",
    "admin2Name",
    "admin1Name",
    "admin0Name",
    "code",
    "GEOID",
    "geoid",
    "id",
    "ID",
];

/// The first non-empty label among `preferred` and
/// [`LABEL_FALLBACK_KEYS`], or `—` when none is set.
#[must_use]
pub fn label_for(properties: Option<&Map<String, Value>>, preferred: Option<&str>) -> String {
    let Some(properties) = properties else {
        return MISSING.to_string();
    };

    preferred
        .into_iter()
        .chain(LABEL_FALLBACK_KEYS)
        .filter_map(|key| properties.get(key).and_then(label_text))
        .next()
        .unwrap_or_else(|| MISSING.to_string())
}

/// Scalar values as written. Blank strings do not count as labels.
fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
