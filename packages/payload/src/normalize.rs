//! Normalizes raw analysis responses into a single [`FeatureCollection`].
//!
//! Never fails: anything that is not recognisable `GeoJSON` normalizes to
//! `None`, which callers treat as "nothing to render".

use lisa_map_payload_models::{FEATURE_COLLECTION_TYPE, FeatureCollection};
use serde_json::Value;

/// Normalizes a decoded response body.
///
/// - an object tagged `"type": "FeatureCollection"` is copied, with
///   `features` forced to an array (empty when missing or malformed)
/// - an array is normalized element by element; unrecognised elements
///   are dropped and the remaining collections are merged by
///   concatenating features under the first collection's other members
/// - anything else is `None`
#[must_use]
pub fn normalize(payload: &Value) -> Option<FeatureCollection> {
    let normalized = match payload {
        Value::Object(_) => normalize_object(payload),
        Value::Array(items) => normalize_array(items),
        _ => None,
    };

    if normalized.is_none() {
        log::warn!("Analysis payload is not a GeoJSON FeatureCollection");
    }

    normalized
}

/// Parses and normalizes a response body given as text.
///
/// Text that is not JSON normalizes to `None`.
#[must_use]
pub fn normalize_str(body: &str) -> Option<FeatureCollection> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize(&value),
        Err(e) => {
            log::warn!("Analysis payload is not JSON: {e}");
            None
        }
    }
}

fn normalize_object(payload: &Value) -> Option<FeatureCollection> {
    let object = payload.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some(FEATURE_COLLECTION_TYPE) {
        return None;
    }

    let features = match object.get("features") {
        Some(Value::Array(features)) => features.clone(),
        Some(other) => {
            log::debug!("Replacing non-array 'features' member ({other}) with an empty list");
            Vec::new()
        }
        None => Vec::new(),
    };

    let members = object
        .iter()
        .filter(|(key, _)| key.as_str() != "type" && key.as_str() != "features")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(FeatureCollection { features, members })
}

fn normalize_array(items: &[Value]) -> Option<FeatureCollection> {
    let mut collections = items.iter().filter_map(|item| {
        let normalized = match item {
            Value::Object(_) => normalize_object(item),
            Value::Array(nested) => normalize_array(nested),
            _ => None,
        };
        if normalized.is_none() {
            log::debug!("Discarding unrecognised element in payload array");
        }
        normalized
    });

    let mut merged = collections.next()?;
    for collection in collections {
        merged.features.extend(collection.features);
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(id: u32) -> Value {
        json!({"type": "Feature", "id": id, "geometry": null, "properties": {"v": id}})
    }

    #[test]
    fn single_collection_is_copied() {
        let payload = json!({
            "type": "FeatureCollection",
            "crs": {"type": "name"},
            "features": [feature(1)]
        });
        let fc = normalize(&payload).unwrap();
        assert_eq!(fc.features, vec![feature(1)]);
        assert_eq!(fc.members.get("crs"), Some(&json!({"type": "name"})));
        assert!(!fc.members.contains_key("type"));
    }

    #[test]
    fn missing_or_malformed_features_become_empty() {
        let fc = normalize(&json!({"type": "FeatureCollection"})).unwrap();
        assert!(fc.is_empty());
        let fc = normalize(&json!({"type": "FeatureCollection", "features": {"a": 1}})).unwrap();
        assert!(fc.is_empty());
    }

    #[test]
    fn arrays_are_merged_in_order() {
        let payload = json!([
            {"type": "FeatureCollection", "name": "first", "features": [feature(1)]},
            {"type": "FeatureCollection", "name": "second", "features": [feature(2)]}
        ]);
        let fc = normalize(&payload).unwrap();
        assert_eq!(fc.features, vec![feature(1), feature(2)]);
        assert_eq!(fc.members.get("name"), Some(&json!("first")));
    }

    #[test]
    fn arrays_drop_unrecognised_elements() {
        let payload = json!([
            "junk",
            {"type": "Feature"},
            [{"type": "FeatureCollection", "features": [feature(3)]}],
            {"type": "FeatureCollection", "features": [feature(4)]}
        ]);
        let fc = normalize(&payload).unwrap();
        assert_eq!(fc.features, vec![feature(3), feature(4)]);
    }

    #[test]
    fn unrecognised_payloads_are_none() {
        assert!(normalize(&json!("not geojson")).is_none());
        assert!(normalize(&json!(null)).is_none());
        assert!(normalize(&json!(42)).is_none());
        assert!(normalize(&json!({"type": "Feature"})).is_none());
        assert!(normalize(&json!([])).is_none());
        assert!(normalize(&json!(["a", 1])).is_none());
        assert!(normalize_str("not geojson").is_none());
    }

    #[test]
    fn normalization_is_idempotent() {
        let payloads = [
            json!({"type": "FeatureCollection", "bbox": [0, 0, 1, 1], "features": [feature(1)]}),
            json!([
                {"type": "FeatureCollection", "features": [feature(1)]},
                {"type": "FeatureCollection", "features": [feature(2)], "crs": null}
            ]),
            json!({"type": "FeatureCollection", "features": "bad"}),
        ];
        for payload in &payloads {
            let once = normalize(payload).unwrap();
            let twice = normalize(&once.to_value()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn parses_text_bodies() {
        let fc = normalize_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(fc.is_empty());
    }
}
